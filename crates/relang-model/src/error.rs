//! Error types for descriptor loading.

use std::path::PathBuf;

/// Errors that can occur while loading or assembling a language descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON serialization error (fingerprinting).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading a descriptor file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor file not found.
    #[error("descriptor file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The definition violates a structural invariant.
    #[error("validation error: {detail}")]
    Validation {
        /// Description of the validation failure(s).
        detail: String,
    },

    /// Mask or value bytes do not match the register width.
    #[error("expected {expected} bytes for register value, got {actual}")]
    ValueLength { expected: usize, actual: usize },

    /// Two values anchored on different registers were combined.
    #[error("cannot combine values of registers {left} and {right}")]
    RegisterMismatch {
        left: crate::register::RegisterId,
        right: crate::register::RegisterId,
    },

    /// A language version string could not be parsed.
    #[error("invalid language version '{0}': expected MAJOR.MINOR")]
    InvalidVersion(String),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
