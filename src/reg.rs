/******************************************************************************
 * Refer to APDS-9960 datasheet for more information, available here:         *
 * - https://www.broadcom.com/products/optical-sensors/                       *
 * ========================================================================== *
 *                 APDS-9960 - Gesture Registers & Memory Map                 *
*******************************************************************************/

pub(crate) const I2C_ADDR: u8 = 0x39;

/// Identifiers reported in the `ID` register by parts the gesture engine supports.
pub(crate) const CHIP_IDS: [u8; 2] = [0xAB, 0x9C];

/// Depth of the on-chip gesture FIFO, in four-byte datasets.
pub(crate) const FIFO_DEPTH: usize = 32;

#[allow(dead_code)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Reg {
  // Enable & timing (0x80..0x83)
  Enable = 0x80,
  ATime = 0x81,
  WTime = 0x83,

  // Proximity pulse & configuration (0x8D..0x90)
  Config1 = 0x8D,
  ProxPulse = 0x8E,
  Control = 0x8F,
  Config2 = 0x90,

  // Identification & status (0x92..0x93)
  Id = 0x92,
  Status = 0x93,

  // Gesture engine configuration (0xA0..0xAB)
  GestureEnterThreshold = 0xA0,
  GestureExitThreshold = 0xA1,
  GestureConfig1 = 0xA2,
  GestureConfig2 = 0xA3,
  GestureOffsetUp = 0xA4,
  GestureOffsetDown = 0xA5,
  GesturePulse = 0xA6,
  GestureOffsetLeft = 0xA7,
  GestureOffsetRight = 0xA9,
  GestureConfig3 = 0xAA,
  GestureConfig4 = 0xAB,

  // Gesture FIFO status (0xAE..0xAF)
  GestureFifoLevel = 0xAE,
  GestureStatus = 0xAF,

  // Gesture FIFO data (0xFC..0xFF), read as U/D/L/R datasets
  GestureFifoUp = 0xFC,
  GestureFifoDown = 0xFD,
  GestureFifoLeft = 0xFE,
  GestureFifoRight = 0xFF,
}

impl From<Reg> for u8 {
  fn from(r: Reg) -> Self {
    r as u8
  }
}
