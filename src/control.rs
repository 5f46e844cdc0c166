use bitfield_struct::bitfield;

/// `ENABLE` (0x80): power and per-engine enable bits.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Enable {
  pub power: bool,
  pub ambient_light: bool,
  pub proximity: bool,
  pub wait: bool,
  pub ambient_light_interrupt: bool,
  pub proximity_interrupt: bool,
  pub gesture: bool,
  __: bool,
}

/// `CONFIG2` (0x90): saturation interrupts and LED boost.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct Config2 {
  #[bits(4)]
  __: u8,
  #[bits(2)]
  pub(crate) led_boost: LedBoost,
  pub(crate) clear_photodiode_saturation_interrupt: bool,
  pub(crate) proximity_saturation_interrupt: bool,
}

/// `GCONF2` (0xA3): gesture gain, LED drive strength and wait time.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct GestureConfig2 {
  #[bits(3)]
  pub(crate) wait_time: GestureWaitTime,
  #[bits(2)]
  pub(crate) led_drive: LedDrive,
  #[bits(2)]
  pub(crate) gain: GestureGain,
  __: bool,
}

/// `GCONF4` (0xAB): gesture state machine control.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct GestureConfig4 {
  /// GMODE: keep the gesture state machine running.
  pub(crate) mode: bool,
  /// GIEN: raise INT when the FIFO reaches the GFIFOTH level.
  pub(crate) interrupts: bool,
  /// GFIFO_CLR: self-clearing FIFO flush.
  pub(crate) fifo_clear: bool,
  #[bits(5)]
  __: u8,
}

/// `GSTATUS` (0xAF): gesture FIFO validity and overflow.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct GestureStatus {
  /// GVALID: the FIFO holds at least GFIFOTH datasets.
  pub(crate) valid: bool,
  /// GFOV: the FIFO filled up and datasets were lost.
  pub(crate) overflow: bool,
  #[bits(6)]
  __: u8,
}

/// Photodiode gain while the gesture engine is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GestureGain {
  X1 = 0b00,
  X2 = 0b01,
  X4 = 0b10,
  X8 = 0b11,
}

impl GestureGain {
  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      0b00 => Self::X1,
      0b01 => Self::X2,
      0b10 => Self::X4,
      _ => Self::X8,
    }
  }
}

/// IR LED drive current while the gesture engine is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LedDrive {
  Ma100 = 0b00,
  Ma50 = 0b01,
  Ma25 = 0b10,
  Ma12_5 = 0b11,
}

impl LedDrive {
  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      0b00 => Self::Ma100,
      0b01 => Self::Ma50,
      0b10 => Self::Ma25,
      _ => Self::Ma12_5,
    }
  }
}

/// Additional LED current on top of the configured drive strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LedBoost {
  Percent100 = 0b00,
  Percent150 = 0b01,
  Percent200 = 0b10,
  Percent300 = 0b11,
}

impl LedBoost {
  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      0b00 => Self::Percent100,
      0b01 => Self::Percent150,
      0b10 => Self::Percent200,
      _ => Self::Percent300,
    }
  }
}

/// Low-power wait between gesture detection cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GestureWaitTime {
  Ms0 = 0b000,
  Ms2_8 = 0b001,
  Ms5_6 = 0b010,
  Ms8_4 = 0b011,
  Ms14_0 = 0b100,
  Ms22_4 = 0b101,
  Ms30_8 = 0b110,
  Ms39_2 = 0b111,
}

impl GestureWaitTime {
  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits & 0b111 {
      0b000 => Self::Ms0,
      0b001 => Self::Ms2_8,
      0b010 => Self::Ms5_6,
      0b011 => Self::Ms8_4,
      0b100 => Self::Ms14_0,
      0b101 => Self::Ms22_4,
      0b110 => Self::Ms30_8,
      _ => Self::Ms39_2,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gesture_config2_fields_use_documented_masks() {
    let reg = GestureConfig2::from_bits(0b1000_0000)
      .with_gain(GestureGain::X4)
      .with_led_drive(LedDrive::Ma25)
      .with_wait_time(GestureWaitTime::Ms2_8);
    assert_eq!(reg.into_bits(), 0b1101_0001);
  }

  #[test]
  fn updating_one_field_keeps_the_rest() {
    let mut reg = GestureConfig2::from_bits(0b1111_1111);
    reg.set_gain(GestureGain::X1);
    assert_eq!(reg.into_bits(), 0b1001_1111);

    let mut reg = Config2::from_bits(0b0000_0001);
    reg.set_led_boost(LedBoost::Percent300);
    assert_eq!(reg.into_bits(), 0b0011_0001);
  }

  #[test]
  fn gesture_status_flags() {
    let st = GestureStatus::from_bits(0b0000_0011);
    assert!(st.valid());
    assert!(st.overflow());
    assert!(!GestureStatus::from_bits(0b1111_1100).valid());
  }

  #[test]
  fn enable_bit_positions() {
    let en = Enable::new().with_power(true).with_gesture(true);
    assert_eq!(en.into_bits(), 0b0100_0001);
    assert!(Enable::from_bits(0b0000_0100).proximity());
  }
}
