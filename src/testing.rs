//! Host-side fakes for the driver tests.
extern crate std;

use core::convert::Infallible;
use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;
use embedded_hal_async::i2c::{ErrorType, I2c, Operation};

use crate::{Reg, Sample};

/// What the sensor reports on one `GSTATUS` read and the FIFO reads after it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Frame {
  pub(crate) valid: bool,
  pub(crate) overflow: bool,
  pub(crate) samples: Vec<Sample>,
}

impl Frame {
  pub(crate) fn valid(samples: &[Sample]) -> Self {
    Self { valid: true, overflow: false, samples: samples.to_vec() }
  }

  pub(crate) fn invalid() -> Self {
    Self::default()
  }
}

/// Register-map fake with a scripted gesture FIFO.
///
/// Every `GSTATUS` read advances to the next scripted [`Frame`]; `GFLVL` and
/// FIFO reads are served from the current frame. Once the script runs out the
/// sensor reports no valid data.
pub(crate) struct FakeBus {
  pub(crate) regs: [u8; 256],
  pub(crate) writes: Vec<(u8, u8)>,
  pub(crate) fifo_reads: Vec<usize>,
  pub(crate) status_reads: usize,
  script: VecDeque<Frame>,
  current: Frame,
  pointer: u8,
}

impl FakeBus {
  pub(crate) fn new() -> Self {
    Self {
      regs: [0; 256],
      writes: Vec::new(),
      fifo_reads: Vec::new(),
      status_reads: 0,
      script: VecDeque::new(),
      current: Frame::default(),
      pointer: 0,
    }
  }

  /// A powered, gesture-enabled APDS-9960.
  pub(crate) fn gesture_ready() -> Self {
    let mut bus = Self::new();
    bus.regs[Reg::Id as usize] = 0xAB;
    bus.regs[Reg::Enable as usize] = 0b0100_1101;
    bus
  }

  pub(crate) fn with_script(mut self, frames: impl IntoIterator<Item = Frame>) -> Self {
    self.script.extend(frames);
    self
  }

  pub(crate) fn reg(&self, reg: Reg) -> u8 {
    self.regs[reg as usize]
  }

  pub(crate) fn writes_to(&self, reg: Reg) -> Vec<u8> {
    self.writes.iter().filter(|(r, _)| *r == reg as u8).map(|(_, v)| *v).collect()
  }

  fn fill(&mut self, buf: &mut [u8]) {
    match self.pointer {
      p if p == Reg::GestureStatus as u8 => {
        self.status_reads += 1;
        self.current = self.script.pop_front().unwrap_or_default();
        buf[0] = self.current.valid as u8 | (self.current.overflow as u8) << 1;
      }
      p if p == Reg::GestureFifoLevel as u8 => {
        buf[0] = self.current.samples.len() as u8;
      }
      p if p == Reg::GestureFifoUp as u8 => {
        self.fifo_reads.push(buf.len());
        for chunk in buf.chunks_mut(4) {
          let s = if self.current.samples.is_empty() { Sample::default() } else { self.current.samples.remove(0) };
          let raw = [s.up, s.down, s.left, s.right];
          chunk.copy_from_slice(&raw[..chunk.len()]);
        }
      }
      p => {
        for (i, b) in buf.iter_mut().enumerate() {
          *b = self.regs[p.wrapping_add(i as u8) as usize];
        }
      }
    }
  }
}

impl ErrorType for FakeBus {
  type Error = Infallible;
}

impl I2c for FakeBus {
  async fn transaction(&mut self, _address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
    for op in operations.iter_mut() {
      match op {
        Operation::Write(bytes) => {
          if let Some((&reg, data)) = bytes.split_first() {
            self.pointer = reg;
            for (i, &b) in data.iter().enumerate() {
              let r = reg.wrapping_add(i as u8);
              self.regs[r as usize] = b;
              self.writes.push((r, b));
            }
          }
        }
        Operation::Read(buf) => self.fill(buf),
      }
    }
    Ok(())
  }
}

/// [`FakeBus`] whose n-th `GSTATUS` read (1-based) fails with
/// [`ErrorKind::Other`]. The failed read does not advance the script.
pub(crate) struct FailingBus {
  pub(crate) inner: FakeBus,
  fail_at: usize,
  status_reads: usize,
}

impl FailingBus {
  pub(crate) fn new(inner: FakeBus, fail_at: usize) -> Self {
    Self { inner, fail_at, status_reads: 0 }
  }
}

impl ErrorType for FailingBus {
  type Error = ErrorKind;
}

impl I2c for FailingBus {
  async fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
    let status_read = matches!(operations.first(), Some(Operation::Write(bytes)) if bytes.first() == Some(&(Reg::GestureStatus as u8)))
      && operations.len() > 1;
    if status_read {
      self.status_reads += 1;
      if self.status_reads == self.fail_at {
        return Err(ErrorKind::Other);
      }
    }
    self.inner.transaction(address, operations).await.map_err(|e| match e {})
  }
}

/// Delay that returns immediately and records every millisecond request.
#[derive(Default)]
pub(crate) struct RecordingDelay {
  pub(crate) ms: Vec<u32>,
}

impl DelayNs for RecordingDelay {
  async fn delay_ns(&mut self, _ns: u32) {}

  async fn delay_ms(&mut self, ms: u32) {
    self.ms.push(ms);
  }
}
