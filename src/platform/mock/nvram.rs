//! Mock NVRAM implementation for testing
//!
//! Provides in-memory settings storage for unit tests.

use crate::platform::{error::NvramError, traits::NvramInterface, Result};
use std::vec::Vec;

/// Storage size (matches a small settings EEPROM)
const NVRAM_CAPACITY: u16 = 256;

/// Mock NVRAM implementation
///
/// Fresh storage reads as all zeroes, like a never-programmed device.
/// Supports corruption injection for testing the safe-default recovery
/// path.
///
/// # Example
///
/// ```
/// use radmon::platform::mock::MockNvram;
/// use radmon::platform::traits::NvramInterface;
///
/// let mut nvram = MockNvram::new();
/// nvram.write(0, &[1, 192, 168, 1, 50]).unwrap();
///
/// let mut buf = [0u8; 5];
/// nvram.read(0, &mut buf).unwrap();
/// assert_eq!(buf, [1, 192, 168, 1, 50]);
/// ```
#[derive(Debug)]
pub struct MockNvram {
    storage: Vec<u8>,
}

impl MockNvram {
    /// Create fresh (all-zero) storage
    pub fn new() -> Self {
        Self {
            storage: vec![0u8; NVRAM_CAPACITY as usize],
        }
    }

    /// Create storage pre-loaded with `contents` at offset 0
    pub fn with_contents(contents: &[u8]) -> Self {
        let mut nvram = Self::new();
        let len = contents.len().min(NVRAM_CAPACITY as usize);
        nvram.storage[..len].copy_from_slice(&contents[..len]);
        nvram
    }

    /// Overwrite `len` bytes at `offset` with a garbage pattern
    pub fn inject_corruption(&mut self, offset: u16, len: usize) {
        for i in 0..len {
            let idx = offset as usize + i;
            if idx < self.storage.len() {
                self.storage[idx] = 0xA5;
            }
        }
    }

    /// Get storage contents (for test verification)
    pub fn contents(&self, offset: u16, len: usize) -> Vec<u8> {
        self.storage[offset as usize..offset as usize + len].to_vec()
    }
}

impl Default for MockNvram {
    fn default() -> Self {
        Self::new()
    }
}

impl NvramInterface for MockNvram {
    fn read(&mut self, offset: u16, buf: &mut [u8]) -> Result<()> {
        let end = offset as usize + buf.len();
        if end > self.storage.len() {
            return Err(NvramError::OutOfRange.into());
        }
        buf.copy_from_slice(&self.storage[offset as usize..end]);
        Ok(())
    }

    fn write(&mut self, offset: u16, data: &[u8]) -> Result<()> {
        let end = offset as usize + data.len();
        if end > self.storage.len() {
            return Err(NvramError::OutOfRange.into());
        }
        self.storage[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    fn capacity(&self) -> u16 {
        NVRAM_CAPACITY
    }
}
