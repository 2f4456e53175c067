//! Simulation platform errors

/// Errors raised while assembling the simulation platform
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid port in {0}: {1}")]
    InvalidPort(&'static str, std::string::String),
}
