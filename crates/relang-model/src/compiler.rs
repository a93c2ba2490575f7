//! Compiler specification identifiers.

use serde::{Deserialize, Serialize};

/// Identifier of a compiler specification (e.g., "gcc", "windows").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompilerSpecId(pub String);

impl CompilerSpecId {
    /// Create an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        CompilerSpecId(id.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompilerSpecId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompilerSpecId {
    fn from(s: &str) -> Self {
        CompilerSpecId(s.to_string())
    }
}

/// A compiler specification declared by a language description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompilerSpecDescriptor {
    /// Unique identifier.
    pub id: CompilerSpecId,
    /// Human-readable name.
    pub name: String,
}

impl CompilerSpecDescriptor {
    /// Create a compiler spec whose display name equals its id.
    pub fn named(id: &str) -> Self {
        CompilerSpecDescriptor {
            id: CompilerSpecId::new(id),
            name: id.to_string(),
        }
    }
}
