//! Processor-context bit fields.
//!
//! Bit positions are counted from the least-significant bit of the
//! context register: bit 0 is the LSB.

use serde::{Deserialize, Serialize};

use crate::register::RegisterId;

/// An inclusive bit range `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct BitRange {
    /// Lowest bit position.
    pub lo: u32,
    /// Highest bit position (inclusive).
    pub hi: u32,
}

impl BitRange {
    /// Create a range; `lo` must not exceed `hi`.
    pub fn new(lo: u32, hi: u32) -> Self {
        BitRange { lo, hi }
    }

    /// Number of bits covered.
    pub fn width(&self) -> u32 {
        self.hi.saturating_sub(self.lo) + 1
    }

    /// Whether the two ranges share a bit.
    pub fn overlaps(&self, other: &BitRange) -> bool {
        self.lo <= other.hi && other.lo <= self.hi
    }

    /// Iterate over the covered bit positions, lowest first.
    pub fn bits(&self) -> impl Iterator<Item = u32> {
        self.lo..=self.hi
    }
}

impl From<[u32; 2]> for BitRange {
    fn from([lo, hi]: [u32; 2]) -> Self {
        BitRange { lo, hi }
    }
}

impl From<BitRange> for [u32; 2] {
    fn from(range: BitRange) -> Self {
        [range.lo, range.hi]
    }
}

impl std::fmt::Display for BitRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.lo, self.hi)
    }
}

/// A context field as written in a descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContextFieldDef {
    /// Field name.
    pub name: String,
    /// Bits of the context register holding the field.
    pub range: BitRange,
}

impl ContextFieldDef {
    /// Define a field over `[lo, hi]`.
    pub fn new(name: &str, lo: u32, hi: u32) -> Self {
        ContextFieldDef {
            name: name.to_string(),
            range: BitRange::new(lo, hi),
        }
    }
}

/// A named bit field of the processor-context register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFieldDescriptor {
    /// Field name.
    pub name: String,
    /// Bits of the context register holding the field.
    pub range: BitRange,
    /// The owning context register.
    pub register: RegisterId,
}

impl ContextFieldDescriptor {
    /// Field width in bits.
    pub fn width(&self) -> u32 {
        self.range.width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_width_and_overlap() {
        let a = BitRange::new(0, 3);
        let c = BitRange::new(2, 2);
        let b = BitRange::new(4, 4);
        assert_eq!(a.width(), 4);
        assert_eq!(c.width(), 1);
        assert!(a.overlaps(&c));
        assert!(!a.overlaps(&b));
        assert_eq!(a.bits().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn range_round_trips_as_pair() {
        let def = ContextFieldDef::new("mode", 2, 3);
        let text = toml::to_string(&def).unwrap();
        assert!(text.contains("range = [2, 3]"));
        let back: ContextFieldDef = toml::from_str(&text).unwrap();
        assert_eq!(back, def);
    }
}
