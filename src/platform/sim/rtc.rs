//! Host-clock RTC for the simulation platform

use crate::platform::{traits::RtcInterface, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// RTC backed by the host clock plus a settable offset
///
/// Setting the clock does not touch the host; it records the delta
/// between the requested time and the host's, so sync steps behave
/// exactly as they would on real hardware.
#[derive(Debug, Default)]
pub struct SimRtc {
    offset: i64,
}

impl SimRtc {
    /// Create an RTC tracking the host clock
    pub fn new() -> Self {
        Self::default()
    }

    fn host_epoch() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

impl RtcInterface for SimRtc {
    fn now(&self) -> u32 {
        let epoch = Self::host_epoch() + self.offset;
        epoch.clamp(0, u32::MAX as i64) as u32
    }

    fn set(&mut self, epoch: u32) -> Result<()> {
        self.offset = epoch as i64 - Self::host_epoch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_steps_the_clock() {
        let mut rtc = SimRtc::new();
        rtc.set(1_000_000).unwrap();
        let now = rtc.now();
        assert!((1_000_000..1_000_002).contains(&now));
    }
}
