//! Processor-context field mapping.
//!
//! Fields are matched by name. A layout change is translatable only when
//! every matched field keeps its width, fits in the new context register,
//! and no two matched fields land on overlapping bits. Anything else would
//! require merging or guessing bits and is reported as a
//! [`ContextIncompatibility`].

use relang_model::{
    BitRange, LanguageDescriptor, PartialRegisterValue, RegisterDescriptor, RegisterId,
};

/// Where one context field lives in the old and the new layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Field name.
    pub name: String,
    /// Bits in the old context register.
    pub old: BitRange,
    /// Bits in the new context register.
    pub new: BitRange,
}

impl FieldMapping {
    /// Whether the field stays at the same bits.
    pub fn is_unmoved(&self) -> bool {
        self.old == self.new
    }
}

/// Why two context layouts cannot be mapped onto each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextIncompatibility {
    /// A field changed width.
    WidthChanged {
        field: String,
        old: BitRange,
        new: BitRange,
    },
    /// A field lies outside the new context register.
    OutOfRange {
        field: String,
        range: BitRange,
        width: u32,
    },
    /// Two matched fields overlap in the new layout.
    Overlap {
        first: String,
        second: String,
    },
}

impl std::fmt::Display for ContextIncompatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextIncompatibility::WidthChanged { field, old, new } => write!(
                f,
                "field '{field}' changed width from {} to {} bits ({old} -> {new})",
                old.width(),
                new.width()
            ),
            ContextIncompatibility::OutOfRange {
                field,
                range,
                width,
            } => write!(
                f,
                "field '{field}' at {range} does not fit the {width}-bit context register"
            ),
            ContextIncompatibility::Overlap { first, second } => {
                write!(f, "fields '{first}' and '{second}' overlap in the new layout")
            }
        }
    }
}

/// Old-to-new bit correspondence for the context register's fields.
#[derive(Debug, Clone)]
pub struct ContextFieldMap {
    new_register: RegisterId,
    new_width: u32,
    identity: bool,
    mappings: Vec<FieldMapping>,
    dropped: Vec<String>,
    added: Vec<String>,
}

impl ContextFieldMap {
    /// Match the fields of two context registers.
    pub fn build(
        old: &LanguageDescriptor,
        old_ctx: &RegisterDescriptor,
        new: &LanguageDescriptor,
        new_ctx: &RegisterDescriptor,
    ) -> Result<Self, ContextIncompatibility> {
        let mut mappings = Vec::new();
        let mut dropped = Vec::new();
        for field in old.context_fields() {
            match new.context_field(&field.name) {
                Some(counterpart) => mappings.push(FieldMapping {
                    name: field.name.clone(),
                    old: field.range,
                    new: counterpart.range,
                }),
                None => dropped.push(field.name.clone()),
            }
        }
        let added: Vec<String> = new
            .context_fields()
            .iter()
            .filter(|f| old.context_field(&f.name).is_none())
            .map(|f| f.name.clone())
            .collect();

        for m in &mappings {
            if m.old.width() != m.new.width() {
                return Err(ContextIncompatibility::WidthChanged {
                    field: m.name.clone(),
                    old: m.old,
                    new: m.new,
                });
            }
            if m.new.hi >= new_ctx.bit_size {
                return Err(ContextIncompatibility::OutOfRange {
                    field: m.name.clone(),
                    range: m.new,
                    width: new_ctx.bit_size,
                });
            }
        }
        for (i, a) in mappings.iter().enumerate() {
            if let Some(b) = mappings[i + 1..].iter().find(|b| a.new.overlaps(&b.new)) {
                return Err(ContextIncompatibility::Overlap {
                    first: a.name.clone(),
                    second: b.name.clone(),
                });
            }
        }

        let identity = old_ctx.bit_size == new_ctx.bit_size
            && dropped.is_empty()
            && added.is_empty()
            && mappings.iter().all(FieldMapping::is_unmoved);

        Ok(ContextFieldMap {
            new_register: new_ctx.id,
            new_width: new_ctx.bit_size,
            identity,
            mappings,
            dropped,
            added,
        })
    }

    /// Whether both layouts are the same (names, ranges, and register width).
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Matched fields, in old declaration order.
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// Old fields with no counterpart; their bits are dropped.
    pub fn dropped_fields(&self) -> &[String] {
        &self.dropped
    }

    /// New fields with no old counterpart; their bits come out unknown.
    pub fn added_fields(&self) -> &[String] {
        &self.added
    }

    /// Move each matched field's bits from its old position to its new one.
    ///
    /// Bits outside matched fields come out unknown.
    pub fn translate(&self, old_value: &PartialRegisterValue) -> PartialRegisterValue {
        let mut out = PartialRegisterValue::unknown(self.new_register, self.new_width);
        for m in &self.mappings {
            for (from, to) in m.old.bits().zip(m.new.bits()) {
                out = out.with_bit(to, old_value.bit(from));
            }
        }
        out
    }
}
