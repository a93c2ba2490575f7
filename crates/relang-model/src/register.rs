//! Register descriptors and the register containment forest.
//!
//! Registers are stored in a flat table addressed by [`RegisterId`]. Each
//! register records the index of its parent: the smallest register in the
//! same address space whose byte range strictly contains its own. Parents
//! are resolved once, when a description is loaded.

use serde::{Deserialize, Serialize};

/// Index of a register in its description's register table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterId(pub usize);

impl RegisterId {
    /// The raw table index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for RegisterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A register as written in a descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegisterDef {
    /// Register name (e.g., "EAX").
    pub name: String,
    /// Name of the owning address space.
    pub space: String,
    /// Byte offset within the space.
    pub offset: u64,
    /// Size in bits.
    pub bit_size: u32,
    /// Whether this is the processor-context register.
    #[serde(default, skip_serializing_if = "is_false")]
    pub context: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl RegisterDef {
    /// Define an ordinary register.
    pub fn new(name: &str, space: &str, offset: u64, bit_size: u32) -> Self {
        RegisterDef {
            name: name.to_string(),
            space: space.to_string(),
            offset,
            bit_size,
            context: false,
        }
    }

    /// Define the processor-context register.
    pub fn context(name: &str, space: &str, offset: u64, bit_size: u32) -> Self {
        RegisterDef {
            context: true,
            ..RegisterDef::new(name, space, offset, bit_size)
        }
    }

    /// Number of bytes the register occupies.
    pub fn byte_len(&self) -> u64 {
        byte_len(self.bit_size)
    }
}

/// A resolved register of a loaded description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDescriptor {
    /// Index in the description's register table.
    pub id: RegisterId,
    /// Register name.
    pub name: String,
    /// Name of the owning address space.
    pub space: String,
    /// Byte offset within the space.
    pub offset: u64,
    /// Size in bits.
    pub bit_size: u32,
    /// Whether this is the processor-context register.
    pub context: bool,
    /// Smallest register strictly containing this one, if any.
    pub parent: Option<RegisterId>,
}

impl RegisterDescriptor {
    /// Number of bytes the register occupies.
    pub fn byte_len(&self) -> u64 {
        byte_len(self.bit_size)
    }

    /// Offset of the register's last byte (inclusive, so it stays
    /// representable at the top of a 64-bit space).
    pub fn last_byte(&self) -> u64 {
        self.offset.saturating_add(self.byte_len().saturating_sub(1))
    }

    /// Whether the register occupies exactly `[offset, offset + len)` in `space`.
    pub fn has_span(&self, space: &str, offset: u64, len: u64) -> bool {
        self.space == space && self.offset == offset && self.byte_len() == len
    }

    /// Whether this register's byte range strictly contains `other`'s.
    pub fn strictly_contains(&self, other: &RegisterDescriptor) -> bool {
        self.space == other.space
            && self.offset <= other.offset
            && other.last_byte() <= self.last_byte()
            && self.byte_len() > other.byte_len()
    }

    /// Whether the two byte ranges share at least one byte.
    pub fn overlaps(&self, other: &RegisterDescriptor) -> bool {
        self.space == other.space
            && self.offset <= other.last_byte()
            && other.offset <= self.last_byte()
    }
}

/// Bytes needed to hold `bit_size` bits.
pub fn byte_len(bit_size: u32) -> u64 {
    u64::from(bit_size).div_ceil(8)
}

/// Build the register table from definitions, resolving parent links.
///
/// Table order follows definition order. Callers are expected to have
/// rejected partial overlaps and duplicate spans beforehand; with those
/// gone, the smallest strict container is unique.
pub(crate) fn resolve_registers(defs: &[RegisterDef]) -> Vec<RegisterDescriptor> {
    let mut table: Vec<RegisterDescriptor> = defs
        .iter()
        .enumerate()
        .map(|(i, def)| RegisterDescriptor {
            id: RegisterId(i),
            name: def.name.clone(),
            space: def.space.clone(),
            offset: def.offset,
            bit_size: def.bit_size,
            context: def.context,
            parent: None,
        })
        .collect();

    let parents: Vec<Option<RegisterId>> = table
        .iter()
        .map(|reg| {
            table
                .iter()
                .filter(|candidate| candidate.strictly_contains(reg))
                .min_by_key(|candidate| candidate.byte_len())
                .map(|candidate| candidate.id)
        })
        .collect();

    for (reg, parent) in table.iter_mut().zip(parents) {
        reg.parent = parent;
    }
    table
}
