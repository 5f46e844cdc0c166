use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{Apds9960, Error, Reg, I2C_ADDR};

impl<I, E, D> Apds9960<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Read a single register.
  pub(crate) async fn read_u8(&mut self, reg: Reg) -> Result<u8, Error<E>> {
    let mut b = [0u8; 1];
    self.read_block(reg, &mut b).await?;
    Ok(b[0])
  }

  /// Write a single register.
  pub(crate) async fn write_u8(&mut self, reg: Reg, value: u8) -> Result<(), Error<E>> {
    self.i2c.write(I2C_ADDR, &[reg.into(), value]).await.map_err(Error::I2c)
  }

  /// Read `buf.len()` bytes starting at `reg` in one transaction.
  ///
  /// The sensor auto-increments the register pointer. Reads that start at the
  /// gesture FIFO wrap inside `0xFC..=0xFF` and pop one dataset every four
  /// bytes, so a FIFO burst must never be split across transactions that touch
  /// other registers.
  pub(crate) async fn read_block(&mut self, reg: Reg, buf: &mut [u8]) -> Result<(), Error<E>> {
    let addr = [reg.into()];
    self.i2c.write_read(I2C_ADDR, &addr, buf).await.map_err(Error::I2c)
  }

  // Typed read-modify-write helpers
  pub(crate) async fn modify<T, F>(&mut self, reg: Reg, f: F) -> Result<(), Error<E>>
  where
    T: From<u8> + Into<u8>,
    F: FnOnce(&mut T),
  {
    let mut value = T::from(self.read_u8(reg).await?);
    f(&mut value);
    self.write_u8(reg, value.into()).await
  }
}
