//! Persisted appliance configuration
//!
//! Operator-configurable settings live in a small NVRAM region with a
//! fixed byte layout, loaded once at boot and written back only on an
//! explicit save from the console. See [`settings`] for the layout.

pub mod settings;

pub use settings::{Settings, TimeSource, DEFAULT_TIME_SOURCE, TIME_SOURCE_MAX_LEN};
