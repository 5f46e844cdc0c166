use crate::decoder::GestureDecoder;
use crate::{DecoderConfig, FIFO_DEPTH};

/// Number of datasets a [`SampleBuffer`] holds.
pub const CAPACITY: usize = FIFO_DEPTH;

/// One gesture FIFO dataset: the four photodiode channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
  pub up: u8,
  pub down: u8,
  pub left: u8,
  pub right: u8,
}

impl Sample {
  pub const fn new(up: u8, down: u8, left: u8, right: u8) -> Self {
    Self { up, down, left, right }
  }

  /// Build a sample from a FIFO dataset laid out as U, D, L, R.
  pub const fn from_fifo(raw: [u8; 4]) -> Self {
    Self::new(raw[0], raw[1], raw[2], raw[3])
  }

  /// Returns `true` when every channel is strictly above `threshold`.
  pub const fn exceeds(&self, threshold: u8) -> bool {
    self.up > threshold && self.down > threshold && self.left > threshold && self.right > threshold
  }

  /// Up/down balance in percent, `0` when both channels are dark.
  pub const fn ud_ratio(&self) -> i32 {
    ratio(self.up, self.down)
  }

  /// Left/right balance in percent, `0` when both channels are dark.
  pub const fn lr_ratio(&self) -> i32 {
    ratio(self.left, self.right)
  }
}

const fn ratio(a: u8, b: u8) -> i32 {
  let sum = a as i32 + b as i32;
  if sum == 0 {
    return 0;
  }
  (a as i32 - b as i32) * 100 / sum
}

/// Fixed-capacity store for the datasets of one FIFO burst.
///
/// Pushing into a full buffer drops the sample and counts it; nothing wraps.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
  samples: [Sample; CAPACITY],
  index: usize,
  total: usize,
  overflowed: u32,
}

impl SampleBuffer {
  pub const fn new() -> Self {
    Self { samples: [Sample::new(0, 0, 0, 0); CAPACITY], index: 0, total: 0, overflowed: 0 }
  }

  /// Append a sample. Returns `false` if the buffer was full and the sample
  /// was dropped.
  pub fn push(&mut self, sample: Sample) -> bool {
    self.total = self.total.saturating_add(1);
    if self.index == CAPACITY {
      self.overflowed = self.overflowed.saturating_add(1);
      return false;
    }
    self.samples[self.index] = sample;
    self.index += 1;
    true
  }

  /// Stored samples, oldest first.
  pub fn as_slice(&self) -> &[Sample] {
    &self.samples[..self.index]
  }

  /// Number of stored samples (the write cursor).
  pub fn len(&self) -> usize {
    self.index
  }

  pub fn is_empty(&self) -> bool {
    self.index == 0
  }

  /// Samples offered since the last clear, dropped ones included.
  pub fn total(&self) -> usize {
    self.total
  }

  /// Samples dropped because the buffer was full, over the buffer's lifetime.
  pub fn overflowed(&self) -> u32 {
    self.overflowed
  }

  /// Rewind the cursor and the per-attempt count. Sample content is left as is.
  pub fn clear(&mut self) {
    self.index = 0;
    self.total = 0;
  }
}

impl Default for SampleBuffer {
  fn default() -> Self {
    Self::new()
  }
}

/// Working state of one gesture engine: the sample buffer and the decoder.
///
/// Each driver instance owns its own session, so several sensors (or tests)
/// never share accumulated deltas.
#[derive(Debug, Clone)]
pub struct GestureSession {
  pub(crate) buffer: SampleBuffer,
  pub(crate) decoder: GestureDecoder,
}

impl GestureSession {
  pub const fn new(config: DecoderConfig) -> Self {
    Self { buffer: SampleBuffer::new(), decoder: GestureDecoder::new(config) }
  }

  pub fn buffer(&self) -> &SampleBuffer {
    &self.buffer
  }

  pub fn decoder(&self) -> &GestureDecoder {
    &self.decoder
  }

  /// Forget everything about the current gesture attempt.
  pub fn reset(&mut self) {
    self.buffer.clear();
    self.decoder.reset();
  }

  /// Run the decoder over the buffered samples.
  pub(crate) fn sweep(&mut self) -> crate::decoder::Sweep {
    self.decoder.process(&self.buffer)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ratios_truncate_and_guard_zero() {
    let s = Sample::new(40, 5, 40, 40);
    assert_eq!(s.ud_ratio(), 77);
    assert_eq!(s.lr_ratio(), 0);
    assert_eq!(Sample::new(5, 40, 0, 0).ud_ratio(), -77);
    assert_eq!(Sample::new(0, 0, 0, 0).lr_ratio(), 0);
  }

  #[test]
  fn exceeds_is_strict_on_every_channel() {
    assert!(Sample::new(31, 31, 31, 31).exceeds(30));
    assert!(!Sample::new(30, 200, 200, 200).exceeds(30));
    assert!(!Sample::new(200, 200, 200, 0).exceeds(30));
  }

  #[test]
  fn from_fifo_keeps_channel_order() {
    assert_eq!(Sample::from_fifo([1, 2, 3, 4]), Sample::new(1, 2, 3, 4));
  }

  #[test]
  fn full_buffer_drops_and_counts() {
    let mut buf = SampleBuffer::new();
    for i in 0..CAPACITY {
      assert!(buf.push(Sample::new(i as u8, 0, 0, 0)));
    }
    assert!(!buf.push(Sample::new(99, 0, 0, 0)));
    assert!(!buf.push(Sample::new(98, 0, 0, 0)));

    assert_eq!(buf.len(), CAPACITY);
    assert_eq!(buf.total(), CAPACITY + 2);
    assert_eq!(buf.overflowed(), 2);
    assert_eq!(buf.as_slice().last().map(|s| s.up), Some(31));
  }

  #[test]
  fn clear_rewinds_cursor_but_keeps_overflow_counter() {
    let mut buf = SampleBuffer::new();
    for _ in 0..CAPACITY + 1 {
      buf.push(Sample::default());
    }
    buf.clear();
    assert!(buf.is_empty());
    assert_eq!(buf.total(), 0);
    assert_eq!(buf.overflowed(), 1);
    assert!(buf.push(Sample::new(7, 7, 7, 7)));
    assert_eq!(buf.as_slice(), &[Sample::new(7, 7, 7, 7)]);
  }
}
