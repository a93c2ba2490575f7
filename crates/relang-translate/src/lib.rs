//! Automatic translation of register data between language versions.
//!
//! Given the descriptors of an old and a new version of a processor
//! language, [`build_translator`] decides whether old register references
//! and values can be carried over losslessly and, if so, returns a
//! [`Translator`] combining:
//! - **Register mapping** by name, with exact-span lookup of old registers
//! - **Context field mapping** for the processor-context register
//! - **Value translation** that keeps every known bit and never invents one
//! - **Compiler-spec mapping** with fallback to the new default
//!
//! When no lossless mapping exists the outcome is
//! [`Feasibility::Unsupported`], never a best-effort guess.

pub mod cache;
pub mod compiler_spec;
pub mod context;
pub mod error;
pub mod factory;
pub mod registers;
pub mod translator;

// Re-exports for convenience.
pub use cache::TranslatorCache;
pub use compiler_spec::CompilerSpecMapper;
pub use context::{ContextFieldMap, ContextIncompatibility, FieldMapping};
pub use error::{Result, TranslateError};
pub use factory::{build_translator, Feasibility, UnsupportedReason};
pub use registers::RegisterMapper;
pub use translator::Translator;
