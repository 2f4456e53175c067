//! Host timer for the simulation platform

use crate::platform::{traits::TimerInterface, Result};
use std::time::{Duration, Instant};

/// Timer over the host's monotonic clock
#[derive(Debug)]
pub struct SimTimer {
    start: Instant,
}

impl SimTimer {
    /// Create a timer with its origin at construction
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SimTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerInterface for SimTimer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        std::thread::sleep(Duration::from_micros(us as u64));
        Ok(())
    }

    fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}
