/// Classified gesture, as delivered to listeners.
///
/// The numeric values match the event codes used by hosts that carry the
/// gesture as a raw number (`0` = no gesture, `1..=6` = directions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Gesture {
  #[default]
  None = 0,
  Right = 1,
  Left = 2,
  Up = 3,
  Down = 4,
  /// Hand moved towards the sensor and stayed (near).
  Forward = 5,
  /// Hand hovered and pulled away (far).
  Backward = 6,
}

impl Gesture {
  /// Returns `true` for the four swipe directions.
  pub const fn is_swipe(self) -> bool {
    matches!(self, Gesture::Up | Gesture::Down | Gesture::Left | Gesture::Right)
  }

  /// Returns `true` for the near/far gestures.
  pub const fn is_depth(self) -> bool {
    matches!(self, Gesture::Forward | Gesture::Backward)
  }

  /// Returns a human-readable name.
  pub const fn as_str(self) -> &'static str {
    match self {
      Gesture::None => "none",
      Gesture::Right => "right",
      Gesture::Left => "left",
      Gesture::Up => "up",
      Gesture::Down => "down",
      Gesture::Forward => "forward",
      Gesture::Backward => "backward",
    }
  }
}

impl From<Gesture> for u8 {
  fn from(g: Gesture) -> Self {
    g as u8
  }
}

impl TryFrom<u8> for Gesture {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(Self::None),
      1 => Ok(Self::Right),
      2 => Ok(Self::Left),
      3 => Ok(Self::Up),
      4 => Ok(Self::Down),
      5 => Ok(Self::Forward),
      6 => Ok(Self::Backward),
      _ => Err(()),
    }
  }
}
