//! Partially known register values.
//!
//! A [`PartialRegisterValue`] records, for each bit of one register, either
//! a concrete 0/1 or "unknown". Bits are stored least-significant byte
//! first; a value bit under an unknown mask bit is always 0.
//!
//! The serialized form ([`PartialRegisterValue::to_bytes`]) is the mask
//! followed by the value, each most-significant byte first and each
//! `ceil(width / 8)` bytes long.

use crate::context::BitRange;
use crate::error::{ModelError, Result};
use crate::register::{byte_len, RegisterId};

/// A register value in which every bit is either known or unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartialRegisterValue {
    register: RegisterId,
    width: u32,
    mask: Vec<u8>,
    value: Vec<u8>,
}

impl PartialRegisterValue {
    /// A value with every bit unknown.
    pub fn unknown(register: RegisterId, width: u32) -> Self {
        let len = byte_len(width) as usize;
        PartialRegisterValue {
            register,
            width,
            mask: vec![0; len],
            value: vec![0; len],
        }
    }

    /// Build a value from mask and value bytes, most-significant byte first.
    ///
    /// Both slices must be exactly `ceil(width / 8)` bytes. Bits above
    /// `width` and value bits under an unknown mask bit are discarded.
    pub fn from_bytes(register: RegisterId, width: u32, mask: &[u8], value: &[u8]) -> Result<Self> {
        let len = byte_len(width) as usize;
        for actual in [mask.len(), value.len()] {
            if actual != len {
                return Err(ModelError::ValueLength {
                    expected: len,
                    actual,
                });
            }
        }
        let mut out = PartialRegisterValue {
            register,
            width,
            mask: mask.iter().rev().copied().collect(),
            value: value.iter().rev().copied().collect(),
        };
        out.normalize();
        Ok(out)
    }

    /// Parse [`to_bytes`](Self::to_bytes) output back into a value.
    pub fn from_serialized(register: RegisterId, width: u32, bytes: &[u8]) -> Result<Self> {
        let len = byte_len(width) as usize;
        if bytes.len() != 2 * len {
            return Err(ModelError::ValueLength {
                expected: 2 * len,
                actual: bytes.len(),
            });
        }
        let (mask, value) = bytes.split_at(len);
        Self::from_bytes(register, width, mask, value)
    }

    /// A fully known value holding `value` (truncated to `width` bits).
    pub fn known(register: RegisterId, width: u32, value: u128) -> Self {
        let mut out = Self::unknown(register, width);
        for bit in 0..width.min(128) {
            out.put(bit, Some(value >> bit & 1 == 1));
        }
        for bit in 128..width {
            out.put(bit, Some(false));
        }
        out
    }

    /// The register this value is anchored on.
    pub fn register(&self) -> RegisterId {
        self.register
    }

    /// Width of the register in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Bit `index`: `Some(bit)` if known, `None` if unknown or out of range.
    pub fn bit(&self, index: u32) -> Option<bool> {
        if index >= self.width {
            return None;
        }
        let (byte, shift) = ((index / 8) as usize, index % 8);
        if self.mask[byte] >> shift & 1 == 0 {
            None
        } else {
            Some(self.value[byte] >> shift & 1 == 1)
        }
    }

    /// Return a copy with bit `index` set to `bit` (`None` marks it unknown).
    ///
    /// Indices at or beyond the register width are ignored.
    pub fn with_bit(mut self, index: u32, bit: Option<bool>) -> Self {
        self.put(index, bit);
        self
    }

    /// Return a copy with the bits of `range` set from the low bits of `value`.
    ///
    /// Range bits beyond the 64 bits of `value` are set to 0.
    pub fn with_bits(mut self, range: BitRange, value: u64) -> Self {
        for (i, bit) in range.bits().enumerate() {
            let known = i < 64 && value >> i & 1 == 1;
            self.put(bit, Some(known));
        }
        self
    }

    /// The bits of `range` as an integer, if every one of them is known.
    pub fn bits(&self, range: BitRange) -> Option<u64> {
        if range.width() > 64 {
            return None;
        }
        range.bits().enumerate().try_fold(0u64, |acc, (i, bit)| {
            self.bit(bit).map(|b| acc | (u64::from(b) << i))
        })
    }

    /// Overlay `other` onto this value: bits known here win, bits unknown
    /// here take `other`'s state.
    pub fn combine(&self, other: &PartialRegisterValue) -> Result<Self> {
        if self.register != other.register || self.width != other.width {
            return Err(ModelError::RegisterMismatch {
                left: self.register,
                right: other.register,
            });
        }
        let mut out = self.clone();
        for i in 0..out.mask.len() {
            let take = other.mask[i] & !self.mask[i];
            out.mask[i] |= take;
            out.value[i] |= other.value[i] & take;
        }
        Ok(out)
    }

    /// Number of known bits.
    pub fn known_bit_count(&self) -> u32 {
        self.mask.iter().map(|b| b.count_ones()).sum()
    }

    /// Whether no bit is known.
    pub fn is_unknown(&self) -> bool {
        self.mask.iter().all(|&b| b == 0)
    }

    /// Whether every bit is known.
    pub fn is_fully_known(&self) -> bool {
        self.known_bit_count() == self.width
    }

    /// The same bits anchored on another register of identical width.
    pub fn reanchor(&self, register: RegisterId) -> Self {
        PartialRegisterValue {
            register,
            ..self.clone()
        }
    }

    /// The same low bits anchored on a register of a different width.
    ///
    /// Extra high bits are unknown; bits beyond `width` are dropped.
    pub fn resized(&self, register: RegisterId, width: u32) -> Self {
        self.placed(register, width, 0)
    }

    /// Copy every bit of this value into a new `width`-bit value anchored on
    /// `register`, with this value's bit 0 landing at bit `shift`.
    ///
    /// Bits that would land beyond `width` are dropped; all other bits of
    /// the result are unknown.
    pub fn placed(&self, register: RegisterId, width: u32, shift: u32) -> Self {
        let mut out = Self::unknown(register, width);
        for bit in 0..self.width {
            if let Some(b) = self.bit(bit) {
                out.put(bit + shift, Some(b));
            }
        }
        out
    }

    /// The `width` bits starting at bit `shift`, anchored on `register`.
    pub fn extracted(&self, register: RegisterId, width: u32, shift: u32) -> Self {
        let mut out = Self::unknown(register, width);
        for bit in 0..width {
            out.put(bit, self.bit(bit + shift));
        }
        out
    }

    /// Mask bytes, most-significant byte first.
    pub fn mask_bytes(&self) -> Vec<u8> {
        self.mask.iter().rev().copied().collect()
    }

    /// Value bytes, most-significant byte first.
    pub fn value_bytes(&self) -> Vec<u8> {
        self.value.iter().rev().copied().collect()
    }

    /// Mask bytes followed by value bytes, each most-significant byte first.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.mask_bytes();
        out.extend(self.value_bytes());
        out
    }

    /// Render as hex digits, most significant first: a digit for a fully
    /// known nibble, `x` for a fully unknown one, `?` for a mixed one.
    pub fn to_hex_pattern(&self) -> String {
        let nibbles = self.width.div_ceil(4);
        (0..nibbles)
            .rev()
            .map(|n| {
                let bits: Vec<Option<bool>> = (n * 4..n * 4 + 4)
                    .filter(|&b| b < self.width)
                    .map(|b| self.bit(b))
                    .collect();
                if bits.iter().all(Option::is_none) {
                    'x'
                } else if bits.iter().all(Option::is_some) {
                    let digit = bits
                        .iter()
                        .enumerate()
                        .fold(0u32, |acc, (i, b)| acc | (u32::from(b == &Some(true)) << i));
                    char::from_digit(digit, 16).unwrap_or('?')
                } else {
                    '?'
                }
            })
            .collect()
    }

    fn put(&mut self, index: u32, bit: Option<bool>) {
        if index >= self.width {
            return;
        }
        let (byte, flag) = ((index / 8) as usize, 1u8 << (index % 8));
        match bit {
            Some(b) => {
                self.mask[byte] |= flag;
                if b {
                    self.value[byte] |= flag;
                } else {
                    self.value[byte] &= !flag;
                }
            }
            None => {
                self.mask[byte] &= !flag;
                self.value[byte] &= !flag;
            }
        }
    }

    fn normalize(&mut self) {
        let spare = self.mask.len() as u32 * 8 - self.width;
        if spare > 0 {
            if let Some(top) = self.mask.last_mut() {
                *top &= 0xFF >> spare;
            }
        }
        for (v, m) in self.value.iter_mut().zip(&self.mask) {
            *v &= *m;
        }
    }
}

impl std::fmt::Display for PartialRegisterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}=0x{}", self.register, self.to_hex_pattern())
    }
}
