use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::decoder::Sweep;
use crate::{Apds9960, Error, Gesture, Reg, Sample, FIFO_DEPTH, FIFO_PAUSE_MS};

/// Bytes per FIFO dataset (U, D, L, R).
const DATASET_LEN: usize = 4;

impl<I, E, D> Apds9960<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Drain the gesture FIFO until the hand leaves or a direction is decoded.
  ///
  /// Returns [`Gesture::None`] right away, without touching the FIFO, unless
  /// the sensor is powered, the gesture engine is enabled and `GVALID` is set.
  /// A chip that is powered down but still has the gesture enable bit set
  /// counts as not ready. Otherwise the FIFO is polled every
  /// [`FIFO_PAUSE_MS`]. A stuck chip (all photodiode ratios zero) is
  /// reinitialized on the fly.
  ///
  /// An error abandons the attempt: the session is reset before it is
  /// returned, so the next call starts from a clean decoder.
  pub async fn read_gesture(&mut self) -> Result<Gesture, Error<E>> {
    let result = self.drain_attempt().await;
    if result.is_err() {
      warn!("APDS9960: gesture attempt abandoned, session reset");
      self.session.reset();
    }
    result
  }

  async fn drain_attempt(&mut self) -> Result<Gesture, Error<E>> {
    if !self.gesture_ready().await? {
      return Ok(Gesture::None);
    }

    loop {
      self.delay.delay_ms(FIFO_PAUSE_MS).await;

      let status = self.gesture_status().await?;
      if status.overflow() {
        warn!("APDS9960: gesture FIFO overflow, datasets lost");
      }

      if !status.valid() {
        self.delay.delay_ms(FIFO_PAUSE_MS).await;
        self.session.decoder.decode();
        let motion = self.session.decoder.motion();
        debug!("APDS9960: hand gone, concluding with {}", motion.as_str());
        self.session.reset();
        return Ok(motion);
      }

      let level = self.read_u8(Reg::GestureFifoLevel).await?;
      if level == 0 {
        continue;
      }
      self.drain_fifo(level as usize).await?;

      match self.session.sweep() {
        Sweep::Inconclusive => {}
        sweep => {
          if sweep == Sweep::Stuck {
            self.recover().await?;
          }
          if let Some(gesture) = self.session.decoder.decode() {
            debug!("APDS9960: decoded {}", gesture.as_str());
            self.session.reset();
            return Ok(gesture);
          }
        }
      }

      self.session.buffer.clear();
    }
  }

  async fn gesture_ready(&mut self) -> Result<bool, Error<E>> {
    if !self.is_gesture_available().await? {
      return Ok(false);
    }
    let en = self.mode().await?;
    Ok(en.power() && en.gesture())
  }

  /// Pop `level` datasets into the session buffer in bursts of at most one
  /// FIFO's worth.
  async fn drain_fifo(&mut self, level: usize) -> Result<(), Error<E>> {
    let mut raw = [0u8; FIFO_DEPTH * DATASET_LEN];
    let mut remaining = level;
    let mut dropped = 0usize;

    while remaining > 0 {
      let count = remaining.min(FIFO_DEPTH);
      let burst = &mut raw[..count * DATASET_LEN];
      self.read_block(Reg::GestureFifoUp, burst).await?;

      for chunk in burst.chunks_exact(DATASET_LEN) {
        let sample = Sample::from_fifo([chunk[0], chunk[1], chunk[2], chunk[3]]);
        if !self.session.buffer.push(sample) {
          dropped += 1;
        }
      }
      remaining -= count;
    }

    debug!("APDS9960: FIFO level {}, buffered {}", level, self.session.buffer.len());
    if dropped > 0 {
      warn!("APDS9960: sample buffer full, dropped {} datasets", dropped);
    }
    Ok(())
  }
}
