//! Background gesture publishing.
//!
//! [`GesturePublisher`] owns the driver, polls it every
//! [`PUBLISH_INTERVAL_MS`] and hands every *change* of gesture to a
//! [`GestureSink`]. The loop stops when an `embassy-sync` [`Signal`] fires.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{Apds9960, Gesture, PUBLISH_INTERVAL_MS};

/// Receiver of published gestures.
pub trait GestureSink {
  fn publish(&mut self, gesture: Gesture);
}

impl<F> GestureSink for F
where
  F: FnMut(Gesture),
{
  fn publish(&mut self, gesture: Gesture) {
    self(gesture)
  }
}

/// Plain function handler stored in [`Listeners`].
pub type Handler = fn(Gesture);

/// Returned when a [`Listeners`] registry has no free slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ListenerFull;

/// Fixed-capacity handler registry, filtered by gesture.
pub struct Listeners<const N: usize> {
  entries: heapless::Vec<(Option<Gesture>, Handler), N>,
}

impl<const N: usize> Listeners<N> {
  pub const fn new() -> Self {
    Self { entries: heapless::Vec::new() }
  }

  /// Run `handler` whenever `gesture` is published.
  pub fn on_gesture_change(&mut self, gesture: Gesture, handler: Handler) -> Result<(), ListenerFull> {
    self.entries.push((Some(gesture), handler)).map_err(|_| ListenerFull)
  }

  /// Run `handler` on every published change.
  pub fn on_change(&mut self, handler: Handler) -> Result<(), ListenerFull> {
    self.entries.push((None, handler)).map_err(|_| ListenerFull)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<const N: usize> Default for Listeners<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<const N: usize> GestureSink for Listeners<N> {
  fn publish(&mut self, gesture: Gesture) {
    for (filter, handler) in self.entries.iter() {
      if filter.map_or(true, |g| g == gesture) {
        handler(gesture);
      }
    }
  }
}

/// Polls a driver and republishes gesture changes.
pub struct GesturePublisher<I, D> {
  sensor: Apds9960<I, D>,
  previous: Gesture,
}

impl<I, E, D> GesturePublisher<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Wrap an initialized driver that is already in gesture mode.
  pub fn new(sensor: Apds9960<I, D>) -> Self {
    Self { sensor, previous: Gesture::None }
  }

  /// Last published gesture.
  pub fn previous(&self) -> Gesture {
    self.previous
  }

  pub fn sensor(&mut self) -> &mut Apds9960<I, D> {
    &mut self.sensor
  }

  pub fn into_inner(self) -> Apds9960<I, D> {
    self.sensor
  }

  /// Read one gesture and publish it if it differs from the previous one.
  ///
  /// Bus errors are logged and swallowed; the previous gesture is kept.
  pub async fn poll<S: GestureSink>(&mut self, sink: &mut S) -> Option<Gesture> {
    match self.sensor.read_gesture().await {
      Ok(gesture) if gesture != self.previous => {
        debug!("APDS9960: publishing {}", gesture.as_str());
        self.previous = gesture;
        sink.publish(gesture);
        Some(gesture)
      }
      Ok(_) => None,
      Err(_) => {
        warn!("APDS9960: gesture poll failed, skipping cycle");
        None
      }
    }
  }

  /// Poll until `stop` is signalled.
  ///
  /// The signal is checked before every poll and raced against the sleep in
  /// between, so a running FIFO drain always completes. `stop` is reset on
  /// return.
  pub async fn run<M: RawMutex, S: GestureSink>(&mut self, sink: &mut S, stop: &Signal<M, ()>) {
    info!("APDS9960: gesture publisher started");

    while !stop.signaled() {
      self.poll(sink).await;

      if let Either::Second(()) = select(self.sensor.delay.delay_ms(PUBLISH_INTERVAL_MS), stop.wait()).await {
        break;
      }
    }

    stop.reset();
    info!("APDS9960: gesture publisher stopped");
  }
}
