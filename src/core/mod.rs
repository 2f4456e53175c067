//! Core appliance infrastructure
//!
//! This module contains the pieces every component leans on: the
//! date/time conversion, the logging macros, and the control-loop
//! driver that composes the components into a running appliance.

pub mod datetime;
pub mod logging;
pub mod runner;

pub use datetime::DateTime;
pub use runner::{Appliance, LoopSignal};
