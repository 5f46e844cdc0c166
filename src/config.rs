use crate::{GestureGain, GestureWaitTime, LedDrive};

/// Wait between FIFO polls, in milliseconds.
///
/// The GSTATUS and GFLVL latches need this long to settle; shorter polls read
/// stale validity bits.
pub const FIFO_PAUSE_MS: u32 = 30;

/// Wait between two publisher iterations, in milliseconds.
pub const PUBLISH_INTERVAL_MS: u32 = 50;

/// WTIME written when entering gesture mode (maximum wait).
pub(crate) const GESTURE_WAIT_TIME: u8 = 0xFF;

/// PPULSE written when entering gesture mode: 16 µs, 10 pulses.
pub(crate) const GESTURE_PROX_PULSE: u8 = 0x89;

/// How a subsystem "off" request is applied to the `ENABLE` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClearPolicy {
  /// Clear only the bit of the requested subsystem.
  #[default]
  PerBit,
  /// Write `0x00` to `ENABLE`, switching every subsystem off.
  ///
  /// Matches hosts that were written against firmware with this behaviour and
  /// rely on "off" powering the whole chip down.
  WholeRegister,
}

/// Thresholds used by the direction decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderConfig {
  /// A FIFO dataset qualifies only when all four channels are above this value.
  pub out_threshold: u8,
  /// Accumulated ratio delta that commits an axis to a direction.
  pub sensitivity_1: i32,
  /// Instantaneous ratio delta under which a sweep counts towards near/far.
  pub sensitivity_2: i32,
}

impl DecoderConfig {
  pub const fn new(out_threshold: u8, sensitivity_1: i32, sensitivity_2: i32) -> Self {
    Self { out_threshold, sensitivity_1, sensitivity_2 }
  }
}

impl Default for DecoderConfig {
  fn default() -> Self {
    Self::new(30, 33, 18)
  }
}

/// Gesture engine configuration staged by [`crate::Apds9960::initialize`].
///
/// Defaults follow the vendor reference values. The configuration is copied
/// into the driver at construction and never changes afterwards.
///
/// ```no_run
/// use apds9960_gesture::{ClearPolicy, Config, GestureGain, LedDrive};
///
/// let config = Config::default()
///   .with_gain(GestureGain::X8)
///   .with_led_drive(LedDrive::Ma50)
///   .with_clear_policy(ClearPolicy::WholeRegister);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  pub decoder: DecoderConfig,
  /// GPENTH: proximity value that starts the gesture state machine.
  pub entry_threshold: u8,
  /// GEXTH: value all channels must drop below to leave gesture mode.
  pub exit_threshold: u8,
  /// GCONF1: FIFO threshold and exit persistence (4 datasets, 1 exit).
  pub gconf1: u8,
  pub gain: GestureGain,
  pub led_drive: LedDrive,
  pub wait_time: GestureWaitTime,
  /// GOFFSET_U/D/L/R, in that order.
  pub offsets: [u8; 4],
  /// GPULSE: pulse length and count (32 µs, 10 pulses).
  pub gesture_pulse: u8,
  /// GCONF3: photodiode selection (0 = all active).
  pub gconf3: u8,
  /// Gesture interrupt enable programmed by initialization and recovery.
  pub interrupts: bool,
  pub clear_policy: ClearPolicy,
}

impl Config {
  #[allow(clippy::too_many_arguments)]
  pub const fn new(
    decoder: DecoderConfig,
    entry_threshold: u8,
    exit_threshold: u8,
    gconf1: u8,
    gain: GestureGain,
    led_drive: LedDrive,
    wait_time: GestureWaitTime,
    offsets: [u8; 4],
    gesture_pulse: u8,
    gconf3: u8,
    interrupts: bool,
    clear_policy: ClearPolicy,
  ) -> Self {
    Self {
      decoder,
      entry_threshold,
      exit_threshold,
      gconf1,
      gain,
      led_drive,
      wait_time,
      offsets,
      gesture_pulse,
      gconf3,
      interrupts,
      clear_policy,
    }
  }

  pub const fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
    self.decoder = decoder;
    self
  }

  pub const fn with_thresholds(mut self, entry: u8, exit: u8) -> Self {
    self.entry_threshold = entry;
    self.exit_threshold = exit;
    self
  }

  pub const fn with_gain(mut self, gain: GestureGain) -> Self {
    self.gain = gain;
    self
  }

  pub const fn with_led_drive(mut self, led_drive: LedDrive) -> Self {
    self.led_drive = led_drive;
    self
  }

  pub const fn with_wait_time(mut self, wait_time: GestureWaitTime) -> Self {
    self.wait_time = wait_time;
    self
  }

  pub const fn with_offsets(mut self, offsets: [u8; 4]) -> Self {
    self.offsets = offsets;
    self
  }

  pub const fn with_interrupts(mut self, interrupts: bool) -> Self {
    self.interrupts = interrupts;
    self
  }

  pub const fn with_clear_policy(mut self, clear_policy: ClearPolicy) -> Self {
    self.clear_policy = clear_policy;
    self
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new(
      DecoderConfig::default(),
      40,
      30,
      0x40,
      GestureGain::X4,
      LedDrive::Ma100,
      GestureWaitTime::Ms2_8,
      [0; 4],
      0xC9,
      0,
      false,
      ClearPolicy::PerBit,
    )
  }
}
