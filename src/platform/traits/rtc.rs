//! Real-time clock interface trait

use crate::platform::Result;

/// Wall-clock interface
///
/// The clock counts seconds since the Unix epoch. The time sync client
/// is the only writer; the telemetry framer and the renderers read it
/// to timestamp and display readings. Stepping the clock (forward or
/// backward) is permitted and shows up as a timestamp discontinuity in
/// subsequent readings.
pub trait RtcInterface {
    /// Current time as seconds since the Unix epoch
    fn now(&self) -> u32;

    /// Set the clock to `epoch` seconds since the Unix epoch
    fn set(&mut self, epoch: u32) -> Result<()>;
}
