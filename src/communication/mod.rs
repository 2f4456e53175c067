//! Network protocols
//!
//! The appliance speaks two protocols: a minimal HTTP interface that
//! publishes the latest reading to polling clients, and an SNTP
//! exchange that keeps the wall clock honest. Both are written against
//! the platform network traits and polled from the control loop.

pub mod httpd;
pub mod sntp;

pub use httpd::{HttpServer, ServerAction};
pub use sntp::{SntpClient, SyncState};
