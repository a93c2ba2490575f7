//! Lookup error types.
//!
//! These signal malformed caller input. An incompatible language pair is not
//! an error: it is reported as [`Feasibility::Unsupported`](crate::Feasibility).
//! A register without a counterpart in the new language is not an error
//! either: mapping operations return `None`.

use relang_model::RegisterId;

/// Errors raised by translator lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// No old register occupies exactly the requested span.
    #[error("no register at {space}:0x{offset:X} with length {length} in the old language")]
    RegisterNotFound {
        space: String,
        offset: u64,
        length: u64,
    },

    /// The new language has no address space with this name.
    #[error("address space '{name}' not found in the new language")]
    SpaceNotFound { name: String },

    /// A value refers to a register id that the old language does not have.
    #[error("register {id} is not part of the old language")]
    UnknownRegister { id: RegisterId },

    /// A value's width does not match its register.
    #[error("value for register '{register}' is {actual} bits wide, expected {expected}")]
    WidthMismatch {
        register: String,
        expected: u32,
        actual: u32,
    },
}

/// Result type alias for translator lookups.
pub type Result<T> = std::result::Result<T, TranslateError>;
