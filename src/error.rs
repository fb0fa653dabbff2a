//! Error types for the fallible edges of the crate.
//!
//! The phase-transition state machine itself never fails: guards degrade to
//! a logged no-op. Only configuration loading returns `LabError`.

/// Errors raised while loading or validating a vignette configuration.
#[derive(Debug, thiserror::Error)]
pub enum LabError {
    /// I/O error reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration was not valid JSON for `VignetteConfig`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field parsed but holds a value the simulation cannot run with.
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

pub type LabResult<T> = Result<T, LabError>;
