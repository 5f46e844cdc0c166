use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::config::{GESTURE_PROX_PULSE, GESTURE_WAIT_TIME};
use crate::control::{Config2, GestureConfig2, GestureConfig4, GestureStatus};
use crate::{Apds9960, ClearPolicy, Enable, Error, GestureGain, GestureWaitTime, LedBoost, LedDrive, Reg};

/// Engines and interrupt sources switched through the `ENABLE` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Subsystem {
  Power = 0,
  AmbientLight = 1,
  Proximity = 2,
  Wait = 3,
  AmbientLightInterrupt = 4,
  ProximityInterrupt = 5,
  Gesture = 6,
}

impl Subsystem {
  pub const fn mask(self) -> u8 {
    1 << self as u8
  }
}

impl<I, E, D> Apds9960<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Read the `ENABLE` register.
  pub async fn mode(&mut self) -> Result<Enable, Error<E>> {
    Ok(Enable::from_bits(self.read_u8(Reg::Enable).await?))
  }

  /// Switch one subsystem on or off.
  ///
  /// "On" sets the subsystem bit and keeps the others. "Off" follows
  /// [`Config::clear_policy`](crate::Config): with [`ClearPolicy::PerBit`] only
  /// that bit is cleared, with [`ClearPolicy::WholeRegister`] the whole
  /// register is written to zero, powering the chip down.
  pub async fn set_subsystem(&mut self, subsystem: Subsystem, on: bool) -> Result<(), Error<E>> {
    let policy = self.config.clear_policy;
    self.update_enable(subsystem, on, policy).await
  }

  /// Write `0x7F` (everything on) or `0x00` to `ENABLE`.
  pub async fn set_all(&mut self, on: bool) -> Result<(), Error<E>> {
    self.write_u8(Reg::Enable, if on { 0x7F } else { 0x00 }).await
  }

  async fn update_enable(&mut self, subsystem: Subsystem, on: bool, policy: ClearPolicy) -> Result<(), Error<E>> {
    let current = self.read_u8(Reg::Enable).await?;
    let next = match (on, policy) {
      (true, _) => current | subsystem.mask(),
      (false, ClearPolicy::PerBit) => current & !subsystem.mask(),
      (false, ClearPolicy::WholeRegister) => 0x00,
    };
    self.write_u8(Reg::Enable, next).await
  }

  /// Photodiode gain in gesture mode (`GCONF2[6:5]`).
  pub async fn set_gesture_gain(&mut self, gain: GestureGain) -> Result<(), Error<E>> {
    self.modify(Reg::GestureConfig2, |r: &mut GestureConfig2| r.set_gain(gain)).await
  }

  /// LED drive strength in gesture mode (`GCONF2[4:3]`).
  pub async fn set_gesture_led_drive(&mut self, drive: LedDrive) -> Result<(), Error<E>> {
    self.modify(Reg::GestureConfig2, |r: &mut GestureConfig2| r.set_led_drive(drive)).await
  }

  /// Wait between gesture cycles (`GCONF2[2:0]`).
  pub async fn set_gesture_wait_time(&mut self, time: GestureWaitTime) -> Result<(), Error<E>> {
    self.modify(Reg::GestureConfig2, |r: &mut GestureConfig2| r.set_wait_time(time)).await
  }

  /// LED current boost (`CONFIG2[5:4]`).
  pub async fn set_led_boost(&mut self, boost: LedBoost) -> Result<(), Error<E>> {
    self.modify(Reg::Config2, |r: &mut Config2| r.set_led_boost(boost)).await
  }

  /// Gesture FIFO interrupt enable (`GCONF4.GIEN`).
  pub async fn set_gesture_interrupts(&mut self, enable: bool) -> Result<(), Error<E>> {
    self.modify(Reg::GestureConfig4, |r: &mut GestureConfig4| r.set_interrupts(enable)).await
  }

  /// Start or stop the gesture state machine (`GCONF4.GMODE`).
  pub async fn set_gesture_mode(&mut self, enable: bool) -> Result<(), Error<E>> {
    self.modify(Reg::GestureConfig4, |r: &mut GestureConfig4| r.set_mode(enable)).await
  }

  /// Returns `true` while the gesture FIFO holds valid data (`GSTATUS.GVALID`).
  pub async fn is_gesture_available(&mut self) -> Result<bool, Error<E>> {
    Ok(self.gesture_status().await?.valid())
  }

  pub(crate) async fn gesture_status(&mut self) -> Result<GestureStatus, Error<E>> {
    Ok(GestureStatus::from_bits(self.read_u8(Reg::GestureStatus).await?))
  }

  /// Reset the session and start the gesture engine.
  ///
  /// With `interrupts` the sensor drives INT when the FIFO fills up.
  pub async fn enter_gesture_mode(&mut self, interrupts: bool) -> Result<(), Error<E>> {
    self.session.reset();
    self.start_gesture_engine(interrupts).await
  }

  /// Stop the gesture state machine and the gesture engine, keeping the other
  /// subsystems as they are.
  pub async fn exit_gesture_mode(&mut self) -> Result<(), Error<E>> {
    self.set_gesture_interrupts(false).await?;
    self.set_gesture_mode(false).await?;
    self.update_enable(Subsystem::Gesture, false, ClearPolicy::PerBit).await?;
    self.session.reset();
    Ok(())
  }

  /// Register half of gesture-mode entry. Power must come on before the
  /// feature bits mean anything, so the enable order is fixed.
  pub(crate) async fn start_gesture_engine(&mut self, interrupts: bool) -> Result<(), Error<E>> {
    self.write_u8(Reg::WTime, GESTURE_WAIT_TIME).await?;
    self.write_u8(Reg::ProxPulse, GESTURE_PROX_PULSE).await?;
    self.set_led_boost(LedBoost::Percent300).await?;
    self.set_gesture_interrupts(interrupts).await?;
    self.set_gesture_mode(true).await?;

    for subsystem in [Subsystem::Power, Subsystem::Wait, Subsystem::Proximity, Subsystem::Gesture] {
      self.set_subsystem(subsystem, true).await?;
    }

    info!("APDS9960: gesture engine started, interrupts: {}", interrupts);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  extern crate std;

  use std::vec;

  use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
  use futures::executor::block_on;

  use super::*;
  use crate::testing::{FakeBus, RecordingDelay};
  use crate::{Config, I2C_ADDR};

  fn sensor(bus: FakeBus, policy: ClearPolicy) -> Apds9960<FakeBus, RecordingDelay> {
    Apds9960::new(bus, RecordingDelay::default(), Config::default().with_clear_policy(policy))
  }

  #[test]
  fn subsystem_on_is_a_read_modify_write() {
    let expectations = [
      Transaction::write_read(I2C_ADDR, vec![0x80], vec![0b0000_0001]),
      Transaction::write(I2C_ADDR, vec![0x80, 0b0000_0101]),
    ];
    let i2c = I2cMock::new(&expectations);
    let mut apds = Apds9960::new(i2c, RecordingDelay::default(), Config::default());

    block_on(apds.set_subsystem(Subsystem::Proximity, true)).unwrap();

    let (mut i2c, _) = apds.destroy();
    i2c.done();
  }

  #[test]
  fn subsystem_on_keeps_previous_bits() {
    let mut apds = sensor(FakeBus::new(), ClearPolicy::WholeRegister);
    block_on(async {
      apds.set_subsystem(Subsystem::Power, true).await?;
      apds.set_subsystem(Subsystem::Gesture, true).await?;
      apds.set_subsystem(Subsystem::Proximity, true).await
    })
    .unwrap();

    let en = block_on(apds.mode()).unwrap();
    assert!(en.proximity());
    assert!(en.power());
    assert!(en.gesture());
    assert_eq!(en.into_bits(), 0b0100_0101);
  }

  #[test]
  fn whole_register_policy_clears_everything_on_off() {
    let mut apds = sensor(FakeBus::new(), ClearPolicy::WholeRegister);
    block_on(async {
      apds.set_subsystem(Subsystem::Power, true).await?;
      apds.set_subsystem(Subsystem::Proximity, true).await?;
      apds.set_subsystem(Subsystem::Proximity, false).await
    })
    .unwrap();

    assert_eq!(block_on(apds.mode()).unwrap().into_bits(), 0x00);
  }

  #[test]
  fn per_bit_policy_clears_only_the_subsystem() {
    let mut apds = sensor(FakeBus::new(), ClearPolicy::PerBit);
    block_on(async {
      apds.set_subsystem(Subsystem::Power, true).await?;
      apds.set_subsystem(Subsystem::Proximity, true).await?;
      apds.set_subsystem(Subsystem::Proximity, false).await
    })
    .unwrap();

    assert_eq!(block_on(apds.mode()).unwrap().into_bits(), 0b0000_0001);
  }

  #[test]
  fn set_all_writes_full_masks() {
    let mut apds = sensor(FakeBus::new(), ClearPolicy::PerBit);
    block_on(apds.set_all(true)).unwrap();
    assert_eq!(block_on(apds.mode()).unwrap().into_bits(), 0x7F);
    block_on(apds.set_all(false)).unwrap();
    assert_eq!(block_on(apds.mode()).unwrap().into_bits(), 0x00);
  }

  #[test]
  fn gain_update_preserves_other_gconf2_bits() {
    let expectations = [
      Transaction::write_read(I2C_ADDR, vec![0xA3], vec![0b1111_1111]),
      Transaction::write(I2C_ADDR, vec![0xA3, 0b1101_1111]),
    ];
    let i2c = I2cMock::new(&expectations);
    let mut apds = Apds9960::new(i2c, RecordingDelay::default(), Config::default());

    block_on(apds.set_gesture_gain(GestureGain::X4)).unwrap();

    let (mut i2c, _) = apds.destroy();
    i2c.done();
  }

  #[test]
  fn gconf2_fields_are_independent() {
    let mut bus = FakeBus::new();
    bus.regs[Reg::GestureConfig2 as usize] = 0b1000_0000;
    let mut apds = sensor(bus, ClearPolicy::PerBit);
    block_on(async {
      apds.set_gesture_gain(GestureGain::X8).await?;
      apds.set_gesture_led_drive(LedDrive::Ma50).await?;
      apds.set_gesture_wait_time(GestureWaitTime::Ms39_2).await
    })
    .unwrap();

    let (bus, _) = apds.destroy();
    assert_eq!(bus.reg(Reg::GestureConfig2), 0b1110_1111);
  }

  #[test]
  fn led_boost_and_gconf4_bits() {
    let mut bus = FakeBus::new();
    bus.regs[Reg::Config2 as usize] = 0b0000_0001;
    bus.regs[Reg::GestureConfig4 as usize] = 0b0000_0100;
    let mut apds = sensor(bus, ClearPolicy::PerBit);
    block_on(async {
      apds.set_led_boost(LedBoost::Percent200).await?;
      apds.set_gesture_interrupts(true).await?;
      apds.set_gesture_mode(true).await
    })
    .unwrap();

    let (bus, _) = apds.destroy();
    assert_eq!(bus.reg(Reg::Config2), 0b0010_0001);
    assert_eq!(bus.reg(Reg::GestureConfig4), 0b0000_0111);
  }

  #[test]
  fn entering_gesture_mode_follows_power_up_order() {
    let mut apds = sensor(FakeBus::new(), ClearPolicy::PerBit);
    block_on(apds.enter_gesture_mode(true)).unwrap();

    let (bus, _) = apds.destroy();
    assert_eq!(bus.reg(Reg::WTime), 0xFF);
    assert_eq!(bus.reg(Reg::ProxPulse), 0x89);
    assert_eq!(bus.reg(Reg::Config2) & 0b0011_0000, 0b0011_0000);
    assert_eq!(bus.reg(Reg::GestureConfig4) & 0b11, 0b11);
    assert_eq!(bus.writes_to(Reg::Enable), vec![0b0000_0001, 0b0000_1001, 0b0000_1101, 0b0100_1101]);
  }

  #[test]
  fn entering_gesture_mode_resets_the_session() {
    let mut apds = sensor(FakeBus::new(), ClearPolicy::PerBit);
    apds.session.buffer.push(crate::Sample::new(1, 2, 3, 4));
    block_on(apds.enter_gesture_mode(false)).unwrap();

    assert!(apds.session().buffer().is_empty());
    let (bus, _) = apds.destroy();
    assert_eq!(bus.reg(Reg::GestureConfig4) & 0b11, 0b01);
  }

  #[test]
  fn exiting_gesture_mode_keeps_other_engines() {
    let mut apds = sensor(FakeBus::new(), ClearPolicy::WholeRegister);
    block_on(async {
      apds.enter_gesture_mode(true).await?;
      apds.exit_gesture_mode().await
    })
    .unwrap();

    let (bus, _) = apds.destroy();
    assert_eq!(bus.reg(Reg::Enable), 0b0000_1101);
    assert_eq!(bus.reg(Reg::GestureConfig4) & 0b11, 0b00);
  }

  #[test]
  fn gesture_available_reads_gvalid() {
    let bus = FakeBus::new().with_script([crate::testing::Frame::valid(&[]), crate::testing::Frame::invalid()]);
    let mut apds = sensor(bus, ClearPolicy::PerBit);
    assert!(block_on(apds.is_gesture_available()).unwrap());
    assert!(!block_on(apds.is_gesture_available()).unwrap());
  }
}
