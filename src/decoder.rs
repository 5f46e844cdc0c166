//! Direction decoder for gesture FIFO bursts.
//!
//! Each burst is reduced to two ratio deltas, up/down and left/right, taken
//! between the first and the last dataset where every photodiode sees the
//! hand. Deltas accumulate across bursts of one gesture attempt until one axis
//! crosses `sensitivity_1`, or until a run of near-zero deltas commits the
//! attempt to a near or far gesture.
//!
//! Sign convention: a growing up/down ratio (light moving to the "up"
//! photodiode) accumulates positively and decodes as [`Gesture::Down`]; a
//! growing left/right ratio decodes as [`Gesture::Right`].

use crate::session::{Sample, SampleBuffer};
use crate::{DecoderConfig, Gesture};

/// Bursts of this many samples or fewer carry no usable motion.
pub const MIN_SAMPLES: usize = 4;

/// Zero-delta sweeps needed before a near/far decision.
const NEAR_SWEEPS: u8 = 10;

/// Small nonzero sweeps needed before a near/far decision.
const FAR_SWEEPS: u8 = 2;

/// Near/far commitment of the current attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
  #[default]
  Idle,
  Near,
  Far,
}

/// Outcome of [`GestureDecoder::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sweep {
  /// Not enough data; decoder state is untouched.
  Inconclusive,
  /// Deltas were accumulated; try [`GestureDecoder::decode`].
  Accumulated,
  /// Every ratio read exactly zero. The decoder restarted its attempt before
  /// accumulating; the chip should be reinitialized.
  Stuck,
}

#[derive(Debug, Clone)]
pub struct GestureDecoder {
  config: DecoderConfig,
  ud_delta: i32,
  lr_delta: i32,
  ud_count: i8,
  lr_count: i8,
  near_count: u8,
  far_count: u8,
  phase: Phase,
  motion: Gesture,
}

impl GestureDecoder {
  pub const fn new(config: DecoderConfig) -> Self {
    Self {
      config,
      ud_delta: 0,
      lr_delta: 0,
      ud_count: 0,
      lr_count: 0,
      near_count: 0,
      far_count: 0,
      phase: Phase::Idle,
      motion: Gesture::None,
    }
  }

  pub fn reset(&mut self) {
    *self = Self::new(self.config);
  }

  pub fn config(&self) -> DecoderConfig {
    self.config
  }

  /// Accumulated up/down and left/right deltas.
  pub fn deltas(&self) -> (i32, i32) {
    (self.ud_delta, self.lr_delta)
  }

  /// Axis counts, each in `-1..=1`.
  pub fn counts(&self) -> (i8, i8) {
    (self.ud_count, self.lr_count)
  }

  /// Near and far sweep counters.
  pub fn near_far(&self) -> (u8, u8) {
    (self.near_count, self.far_count)
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  /// Last successfully decoded gesture, [`Gesture::None`] after a reset.
  pub fn motion(&self) -> Gesture {
    self.motion
  }

  /// Fold one burst of samples into the running deltas.
  pub fn process(&mut self, buffer: &SampleBuffer) -> Sweep {
    let samples = buffer.as_slice();
    if samples.len() <= MIN_SAMPLES {
      return Sweep::Inconclusive;
    }

    let threshold = self.config.out_threshold;
    let Some(first) = samples.iter().find(|s| s.exceeds(threshold)) else {
      return Sweep::Inconclusive;
    };
    let last = samples.iter().rev().find(|s| s.exceeds(threshold)).unwrap_or(first);

    let stuck = is_stuck(first, last);
    if stuck {
      self.reset();
    }

    let ud = last.ud_ratio() - first.ud_ratio();
    let lr = last.lr_ratio() - first.lr_ratio();
    self.accumulate(ud, lr);

    if stuck {
      Sweep::Stuck
    } else {
      Sweep::Accumulated
    }
  }

  fn accumulate(&mut self, ud: i32, lr: i32) {
    self.ud_delta = self.ud_delta.saturating_add(ud);
    self.lr_delta = self.lr_delta.saturating_add(lr);
    self.ud_count = self.axis_count(self.ud_delta);
    self.lr_count = self.axis_count(self.lr_delta);

    let s2 = self.config.sensitivity_2;
    if ud.abs() >= s2 || lr.abs() >= s2 {
      return;
    }
    let still = ud == 0 && lr == 0;

    if self.ud_count == 0 && self.lr_count == 0 {
      if still {
        self.near_count = self.near_count.saturating_add(1);
      } else {
        self.far_count = self.far_count.saturating_add(1);
      }

      if self.near_count >= NEAR_SWEEPS && self.far_count >= FAR_SWEEPS {
        if still {
          self.phase = Phase::Near;
        } else if ud != 0 && lr != 0 {
          self.phase = Phase::Far;
        }
      }
    } else {
      if still {
        self.near_count = self.near_count.saturating_add(1);
      }

      // Axis crossed the threshold but the hand is not moving: noise
      if self.near_count >= NEAR_SWEEPS {
        self.ud_count = 0;
        self.lr_count = 0;
        self.ud_delta = 0;
        self.lr_delta = 0;
      }
    }
  }

  fn axis_count(&self, delta: i32) -> i8 {
    let s1 = self.config.sensitivity_1;
    if delta >= s1 {
      1
    } else if delta <= -s1 {
      -1
    } else {
      0
    }
  }

  /// Map the current state to a gesture.
  ///
  /// Returns `None` while neither a phase nor an axis direction is
  /// established; the state is left untouched in that case.
  pub fn decode(&mut self) -> Option<Gesture> {
    let gesture = match self.phase {
      Phase::Near => Gesture::Forward,
      Phase::Far => Gesture::Backward,
      Phase::Idle => {
        let ud_dominant = self.ud_delta.unsigned_abs() > self.lr_delta.unsigned_abs();
        match (self.ud_count, self.lr_count) {
          (-1, 0) => Gesture::Up,
          (1, 0) => Gesture::Down,
          (0, 1) => Gesture::Right,
          (0, -1) => Gesture::Left,
          (-1, 1) => pick(ud_dominant, Gesture::Up, Gesture::Right),
          (1, -1) => pick(ud_dominant, Gesture::Down, Gesture::Left),
          (-1, -1) => pick(ud_dominant, Gesture::Up, Gesture::Left),
          (1, 1) => pick(ud_dominant, Gesture::Down, Gesture::Right),
          _ => return None,
        }
      }
    };

    self.motion = gesture;
    Some(gesture)
  }
}

fn is_stuck(first: &Sample, last: &Sample) -> bool {
  first.ud_ratio() == 0 && first.lr_ratio() == 0 && last.ud_ratio() == 0 && last.lr_ratio() == 0
}

fn pick(ud_dominant: bool, ud: Gesture, lr: Gesture) -> Gesture {
  if ud_dominant {
    ud
  } else {
    lr
  }
}
