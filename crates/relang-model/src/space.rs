//! Address space descriptors.

use serde::{Deserialize, Serialize};

/// What an address space holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpaceKind {
    /// Main memory.
    Ram,
    /// Code-only memory (Harvard architectures).
    Code,
    /// Register file.
    Register,
    /// Anything else (I/O ports, overlays, internal spaces).
    Other,
}

impl std::fmt::Display for SpaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpaceKind::Ram => "ram",
            SpaceKind::Code => "code",
            SpaceKind::Register => "register",
            SpaceKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// A named address space of a processor description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddressSpace {
    /// Space name, unique within a description (e.g., "ram", "register").
    pub name: String,
    /// What the space holds.
    pub kind: SpaceKind,
    /// Size of an address in this space, in bytes.
    pub size: u32,
    /// Whether this is the default data space.
    #[serde(default)]
    pub default: bool,
}

impl AddressSpace {
    /// Create a non-default address space.
    pub fn new(name: impl Into<String>, kind: SpaceKind, size: u32) -> Self {
        AddressSpace {
            name: name.into(),
            kind,
            size,
            default: false,
        }
    }

    /// Mark this space as the default space.
    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    /// Largest byte offset addressable in this space.
    pub fn max_offset(&self) -> u64 {
        if self.size >= 8 {
            u64::MAX
        } else {
            (1u64 << (self.size * 8)) - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_offset_by_size() {
        assert_eq!(AddressSpace::new("r", SpaceKind::Register, 1).max_offset(), 0xFF);
        assert_eq!(
            AddressSpace::new("ram", SpaceKind::Ram, 4).max_offset(),
            0xFFFF_FFFF
        );
        assert_eq!(AddressSpace::new("big", SpaceKind::Ram, 8).max_offset(), u64::MAX);
    }

    #[test]
    fn kind_serializes_kebab_case() {
        let space = AddressSpace::new("register", SpaceKind::Register, 4);
        let s = toml::to_string(&space).unwrap();
        assert!(s.contains("kind = \"register\""));
        assert!(s.contains("default = false"));
    }
}
