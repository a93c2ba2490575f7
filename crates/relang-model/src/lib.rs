//! Language descriptor tables for the relang translation engine.
//!
//! A language descriptor is the structural description of one version of a
//! processor model:
//! - **Address spaces:** named spaces such as `ram` and `register`
//! - **Registers:** a flat table with resolved parent links forming a
//!   containment forest
//! - **Processor context:** the context register and its named bit fields
//! - **Compiler specs:** declared compiler specifications and the default
//!
//! Descriptors are loaded from TOML definitions, validated once, and never
//! mutated afterwards. [`PartialRegisterValue`] carries register contents in
//! which each bit is either known or unknown.

pub mod compiler;
pub mod context;
pub mod error;
pub mod fingerprint;
pub mod language;
pub mod parse;
pub mod register;
pub mod space;
pub mod value;

// Re-exports for convenience.
pub use compiler::{CompilerSpecDescriptor, CompilerSpecId};
pub use context::{BitRange, ContextFieldDef, ContextFieldDescriptor};
pub use error::{ModelError, Result};
pub use fingerprint::Fingerprint;
pub use language::{
    Endianness, LanguageDefinition, LanguageDescriptor, LanguageId, LanguageVersion, VersionKey,
};
pub use parse::{
    language_to_toml, load_language, load_language_toml, parse_language_toml,
    validate_definition, Severity, ValidationIssue,
};
pub use register::{RegisterDef, RegisterDescriptor, RegisterId};
pub use space::{AddressSpace, SpaceKind};
pub use value::PartialRegisterValue;
