use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{Apds9960, Error, Reg, CHIP_IDS};

impl<I, E, D> Apds9960<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Verify the chip identity and load the gesture engine configuration.
  ///
  /// Nothing is written when the `ID` register holds an unknown value.
  pub async fn initialize(&mut self) -> Result<(), Error<E>> {
    let id = self.read_u8(Reg::Id).await?;
    if !CHIP_IDS.contains(&id) {
      return Err(Error::InvalidChipId(id));
    }

    let config = self.config;
    self.write_u8(Reg::GestureEnterThreshold, config.entry_threshold).await?;
    self.write_u8(Reg::GestureExitThreshold, config.exit_threshold).await?;
    self.write_u8(Reg::GestureConfig1, config.gconf1).await?;
    self.set_gesture_gain(config.gain).await?;
    self.set_gesture_led_drive(config.led_drive).await?;
    self.set_gesture_wait_time(config.wait_time).await?;

    let [up, down, left, right] = config.offsets;
    self.write_u8(Reg::GestureOffsetUp, up).await?;
    self.write_u8(Reg::GestureOffsetDown, down).await?;
    self.write_u8(Reg::GestureOffsetLeft, left).await?;
    self.write_u8(Reg::GestureOffsetRight, right).await?;

    self.write_u8(Reg::GesturePulse, config.gesture_pulse).await?;
    self.write_u8(Reg::GestureConfig3, config.gconf3).await?;
    self.set_gesture_interrupts(config.interrupts).await?;

    info!("APDS9960: initialized, chip id {=u8:#x}", id);
    Ok(())
  }

  /// Chip recovery after a stuck reading: reload the configuration and rerun
  /// the register half of gesture-mode entry. The session is left alone.
  ///
  /// The engine restarts with [`Config::interrupts`](crate::Config), so a
  /// driver configured for interrupt-driven reads keeps its INT line armed
  /// after recovery.
  pub(crate) async fn recover(&mut self) -> Result<(), Error<E>> {
    warn!("APDS9960: all gesture ratios zero, reinitializing");
    self.initialize().await?;
    self.start_gesture_engine(self.config.interrupts).await
  }
}
