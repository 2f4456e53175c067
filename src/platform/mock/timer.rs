//! Mock Timer implementation for testing

use crate::platform::{traits::TimerInterface, Result};

/// Mock Timer implementation
///
/// Delays advance a simulated clock instead of sleeping, so bounded
/// waits (SNTP reply windows, response drain delays) complete
/// instantly in tests while the elapsed-time arithmetic stays
/// observable.
#[derive(Debug)]
pub struct MockTimer {
    now_us: u64,
}

impl MockTimer {
    /// Create a new mock timer at time zero
    pub fn new() -> Self {
        Self { now_us: 0 }
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerInterface for MockTimer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        self.now_us = self.now_us.wrapping_add(us as u64);
        Ok(())
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_timer_delay_advances() {
        let mut timer = MockTimer::new();
        assert_eq!(timer.now_us(), 0);

        timer.delay_us(1500).unwrap();
        assert_eq!(timer.now_us(), 1500);

        timer.delay_ms(2).unwrap();
        assert_eq!(timer.now_us(), 3500);
        assert_eq!(timer.now_ms(), 3);
    }
}
