//! Logging abstraction
//!
//! Provides unified logging macros that work across the build targets:
//! - Embedded (`defmt` feature): defmt via the target's transport
//! - Host builds (`std` feature): the `log` facade (the simulation
//!   binary installs `env_logger`)
//! - Plain `cargo test`: `println!`
//!
//! Diagnostics are operator-facing only; nothing here is ever surfaced
//! to network clients.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "std"))]
        ::log::info!($($arg)*);

        #[cfg(all(not(feature = "defmt"), not(feature = "std"), test))]
        println!("[INFO] {}", format!($($arg)*));
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "std"))]
        ::log::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt"), not(feature = "std"), test))]
        println!("[WARN] {}", format!($($arg)*));
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "std"))]
        ::log::error!($($arg)*);

        #[cfg(all(not(feature = "defmt"), not(feature = "std"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "std"))]
        ::log::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt"), not(feature = "std"), test))]
        println!("[DEBUG] {}", format!($($arg)*));
    }};
}
