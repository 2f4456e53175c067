//! Instrument drivers
//!
//! Device drivers written against the platform abstraction traits, so
//! the same code runs over hardware serial ports, the host simulation
//! bridge, and the in-memory mocks.

pub mod geiger;

pub use geiger::{Field, GeigerDriver, Reading};
