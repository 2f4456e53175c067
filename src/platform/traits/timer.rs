//! Timer interface trait

use crate::platform::Result;

/// Monotonic time and bounded delays
///
/// The control loop has exactly two legitimate waits: the SNTP reply
/// timeout and the short drain delay after writing an HTTP response.
/// Both go through this trait so tests can make them instantaneous.
pub trait TimerInterface {
    /// Delay for `us` microseconds
    fn delay_us(&mut self, us: u32) -> Result<()>;

    /// Delay for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delay_us(ms.saturating_mul(1000))
    }

    /// Microseconds since an arbitrary monotonic origin
    fn now_us(&self) -> u64;

    /// Milliseconds since an arbitrary monotonic origin
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
