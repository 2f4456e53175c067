//! Non-volatile settings storage interface trait

use crate::platform::Result;

/// Byte-addressed non-volatile storage
///
/// Models a small EEPROM-like region used for persisted settings.
/// Contents survive power cycles; a fresh device reads as all zeroes.
/// There is no erase step and writes are byte-granular, unlike block
/// flash.
pub trait NvramInterface {
    /// Read `buf.len()` bytes starting at `offset`
    fn read(&mut self, offset: u16, buf: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `offset`
    fn write(&mut self, offset: u16, data: &[u8]) -> Result<()>;

    /// Total storage size in bytes
    fn capacity(&self) -> u16;
}
