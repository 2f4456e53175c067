//! File-backed NVRAM for the simulation platform

use crate::platform::{error::NvramError, traits::NvramInterface, Result};
use std::fs;
use std::path::PathBuf;
use std::vec::Vec;

/// Storage size, matching the mock
const NVRAM_CAPACITY: u16 = 256;

/// Settings storage persisted to a local file
///
/// A missing file reads as all zeroes, exactly like a fresh device.
/// Every write rewrites the whole image; at 256 bytes that is cheaper
/// than being clever.
#[derive(Debug)]
pub struct SimNvram {
    path: PathBuf,
    image: Vec<u8>,
}

impl SimNvram {
    /// Open (or implicitly create) the backing file at `path`
    pub fn open(path: PathBuf) -> Self {
        let mut image = vec![0u8; NVRAM_CAPACITY as usize];
        if let Ok(contents) = fs::read(&path) {
            let len = contents.len().min(image.len());
            image[..len].copy_from_slice(&contents[..len]);
        }
        Self { path, image }
    }
}

impl NvramInterface for SimNvram {
    fn read(&mut self, offset: u16, buf: &mut [u8]) -> Result<()> {
        let end = offset as usize + buf.len();
        if end > self.image.len() {
            return Err(NvramError::OutOfRange.into());
        }
        buf.copy_from_slice(&self.image[offset as usize..end]);
        Ok(())
    }

    fn write(&mut self, offset: u16, data: &[u8]) -> Result<()> {
        let end = offset as usize + data.len();
        if end > self.image.len() {
            return Err(NvramError::OutOfRange.into());
        }
        self.image[offset as usize..end].copy_from_slice(data);
        fs::write(&self.path, &self.image).map_err(|_| NvramError::WriteFailed)?;
        Ok(())
    }

    fn capacity(&self) -> u16 {
        NVRAM_CAPACITY
    }
}
