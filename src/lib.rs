#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async, `no_std` gesture engine for the Broadcom APDS-9960 proximity and
//! gesture sensor.
//!
//! The APDS-9960 streams four photodiode channels (up, down, left, right) into
//! a 32-entry gesture FIFO while a hand is over the sensor. This crate drains
//! that FIFO and turns the raw intensities into a discrete [`Gesture`]:
//!
//! - Typed access to the gesture registers (gain, LED drive and boost, wait
//!   time, gesture state machine) instead of raw bit-twiddling
//! - Identity-checked initialization with the vendor reference defaults
//! - A ratio-based direction decoder with near/far detection, kept in an
//!   explicit per-driver [`GestureSession`]
//! - A background [`GesturePublisher`] that republishes gesture changes to
//!   listeners and stops on an `embassy-sync` signal (`publisher` feature)
//! - `embedded-hal` / `embedded-hal-async` 1.0 traits so the driver works
//!   across MCU families
//!
//! ```no_run
//! use embedded_hal_async::{delay::DelayNs, i2c::{I2c, SevenBitAddress}};
//! use apds9960_gesture::{Apds9960, Config, Gesture};
//!
//! async fn example<I2C, D, E>(i2c: I2C, delay: D) -> Result<Gesture, apds9960_gesture::Error<E>>
//! where
//!   I2C: I2c<SevenBitAddress, Error = E>,
//!   D: DelayNs,
//! {
//!   let mut sensor = Apds9960::new(i2c, delay, Config::default());
//!   sensor.initialize().await?;
//!   sensor.enter_gesture_mode(false).await?;
//!   sensor.read_gesture().await
//! }
//! ```

#[macro_use]
mod fmt;

mod config;
mod control;
mod decoder;
mod event;
mod fifo;
mod init;
mod mode;
#[cfg(feature = "publisher")]
mod publisher;
mod reg;
mod rw;
mod session;
#[cfg(test)]
mod testing;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

pub use config::*;
pub use control::{Enable, GestureGain, GestureWaitTime, LedBoost, LedDrive};
pub use decoder::{GestureDecoder, Phase, Sweep, MIN_SAMPLES};
pub use event::Gesture;
pub use mode::Subsystem;
#[cfg(feature = "publisher")]
pub use publisher::*;
use reg::*;
pub use session::{GestureSession, Sample, SampleBuffer, CAPACITY};

/// Errors that can occur while interacting with the sensor.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// I²C bus transaction failed with the underlying driver error.
  I2c(E),
  /// The device reported an unexpected chip identifier during bring-up.
  InvalidChipId(u8),
}

/// APDS-9960 gesture engine.
///
/// The driver owns the I²C peripheral, a delay provider and the gesture
/// session. Create it with [`Apds9960::new`], call [`Apds9960::initialize`]
/// once, then [`Apds9960::enter_gesture_mode`] before polling
/// [`Apds9960::read_gesture`].
pub struct Apds9960<I, D> {
  i2c: I,
  delay: D,
  config: Config,
  session: GestureSession,
}

impl<I, E, D> Apds9960<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Create a new driver instance. Nothing is sent to the device until
  /// [`Apds9960::initialize`] is called.
  pub fn new(i2c: I, delay: D, config: Config) -> Self {
    Self { i2c, delay, config, session: GestureSession::new(config.decoder) }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Working state of the current gesture attempt.
  pub fn session(&self) -> &GestureSession {
    &self.session
  }

  /// Drop the accumulated samples and decoder state.
  pub fn reset_session(&mut self) {
    self.session.reset();
  }

  /// Release the bus and the delay provider.
  pub fn destroy(self) -> (I, D) {
    (self.i2c, self.delay)
  }
}
