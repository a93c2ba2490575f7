//! Translator feasibility decision.
//!
//! [`build_translator`] offers automatic translation only when every old
//! register can be repositioned without losing or guessing bits. Otherwise
//! it returns [`Feasibility::Unsupported`] and the caller must fall back to a
//! hand-written translator or refuse the upgrade.

use std::sync::Arc;

use relang_model::{Endianness, LanguageDescriptor, SpaceKind};

use crate::context::{ContextFieldMap, ContextIncompatibility};
use crate::registers::counterpart;
use crate::translator::Translator;

/// Why no automatic translator exists for a language pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// The two languages describe different processors.
    ProcessorMismatch { old: String, new: String },
    /// Byte order changed.
    EndiannessMismatch { old: Endianness, new: Endianness },
    /// A surviving register lives in a space the new language lacks.
    UnmappedSpace { space: String, register: String },
    /// A surviving register now lives in a space of a different kind.
    SpaceKindChanged {
        register: String,
        space: String,
        old: SpaceKind,
        new: SpaceKind,
    },
    /// The context field layout cannot be remapped bit for bit.
    ContextLayout(ContextIncompatibility),
    /// A surviving register became narrower.
    RegisterNarrowed {
        register: String,
        old_bits: u32,
        new_bits: u32,
    },
}

impl std::fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsupportedReason::ProcessorMismatch { old, new } => {
                write!(f, "processor changed from '{old}' to '{new}'")
            }
            UnsupportedReason::EndiannessMismatch { old, new } => {
                write!(f, "endianness changed from {old} to {new}")
            }
            UnsupportedReason::UnmappedSpace { space, register } => write!(
                f,
                "address space '{space}' (used by register '{register}') has no counterpart"
            ),
            UnsupportedReason::SpaceKindChanged {
                register,
                space,
                old,
                new,
            } => write!(
                f,
                "register '{register}' was in a {old} space, now in '{space}' ({new})"
            ),
            UnsupportedReason::ContextLayout(cause) => {
                write!(f, "context field layout not losslessly mappable: {cause}")
            }
            UnsupportedReason::RegisterNarrowed {
                register,
                old_bits,
                new_bits,
            } => write!(
                f,
                "register '{register}' narrowed from {old_bits} to {new_bits} bits"
            ),
        }
    }
}

/// Outcome of a translator request.
#[derive(Debug, Clone)]
#[must_use]
pub enum Feasibility {
    /// Automatic translation is available.
    Built(Translator),
    /// No lossless automatic translation exists.
    Unsupported(UnsupportedReason),
}

impl Feasibility {
    /// Whether a translator was built.
    pub fn is_built(&self) -> bool {
        matches!(self, Feasibility::Built(_))
    }

    /// The translator, if one was built.
    pub fn translator(&self) -> Option<&Translator> {
        match self {
            Feasibility::Built(t) => Some(t),
            Feasibility::Unsupported(_) => None,
        }
    }

    /// Consume the outcome, keeping the translator if one was built.
    pub fn into_translator(self) -> Option<Translator> {
        match self {
            Feasibility::Built(t) => Some(t),
            Feasibility::Unsupported(_) => None,
        }
    }

    /// Why translation is unsupported, if it is.
    pub fn unsupported_reason(&self) -> Option<&UnsupportedReason> {
        match self {
            Feasibility::Built(_) => None,
            Feasibility::Unsupported(reason) => Some(reason),
        }
    }
}

/// Decide whether `old` can be translated to `new` automatically and, if
/// so, build the translator.
pub fn build_translator(old: Arc<LanguageDescriptor>, new: Arc<LanguageDescriptor>) -> Feasibility {
    match check(&old, &new) {
        Ok(context) => {
            let translator = Translator::new(old, new, context);
            log::info!(
                "built translator {translator} ({} registers mapped)",
                translator.mapped_register_count()
            );
            Feasibility::Built(translator)
        }
        Err(reason) => {
            log::warn!("no automatic translation from {old} to {new}: {reason}");
            Feasibility::Unsupported(reason)
        }
    }
}

fn check(
    old: &LanguageDescriptor,
    new: &LanguageDescriptor,
) -> Result<Option<ContextFieldMap>, UnsupportedReason> {
    if old.processor() != new.processor() {
        return Err(UnsupportedReason::ProcessorMismatch {
            old: old.processor().to_string(),
            new: new.processor().to_string(),
        });
    }
    if old.endianness() != new.endianness() {
        return Err(UnsupportedReason::EndiannessMismatch {
            old: old.endianness(),
            new: new.endianness(),
        });
    }

    for reg in old.registers() {
        let Some(new_reg) = counterpart(new, reg) else {
            log::debug!("register '{}' is absent from {new}", reg.name);
            continue;
        };
        if new.space(&reg.space).is_none() {
            return Err(UnsupportedReason::UnmappedSpace {
                space: reg.space.clone(),
                register: reg.name.clone(),
            });
        }
        // Kinds are compared against the space the counterpart lives in.
        if let (Some(o), Some(n)) = (old.space(&reg.space), new.space(&new_reg.space)) {
            if o.kind != n.kind {
                return Err(UnsupportedReason::SpaceKindChanged {
                    register: reg.name.clone(),
                    space: new_reg.space.clone(),
                    old: o.kind,
                    new: n.kind,
                });
            }
        }
        if !reg.context && new_reg.bit_size < reg.bit_size {
            return Err(UnsupportedReason::RegisterNarrowed {
                register: reg.name.clone(),
                old_bits: reg.bit_size,
                new_bits: new_reg.bit_size,
            });
        }
    }

    match (old.context_register(), new.context_register()) {
        (Some(old_ctx), Some(new_ctx)) => {
            let map = ContextFieldMap::build(old, old_ctx, new, new_ctx)
                .map_err(UnsupportedReason::ContextLayout)?;
            log::debug!(
                "context fields: {} mapped, {} dropped, {} added",
                map.mappings().len(),
                map.dropped_fields().len(),
                map.added_fields().len()
            );
            Ok(Some(map))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use relang_model::{
        AddressSpace, CompilerSpecDescriptor, CompilerSpecId, ContextFieldDef, LanguageDefinition,
        LanguageId, LanguageVersion, RegisterDef,
    };

    use super::*;

    fn definition() -> LanguageDefinition {
        LanguageDefinition {
            id: LanguageId::new("toy:LE:32:default"),
            processor: "toy".into(),
            endianness: Endianness::Little,
            version: LanguageVersion::new(1, 0),
            default_compiler_spec: CompilerSpecId::new("default"),
            compiler_specs: vec![CompilerSpecDescriptor::named("default")],
            spaces: vec![
                AddressSpace::new("ram", SpaceKind::Ram, 4).as_default(),
                AddressSpace::new("register", SpaceKind::Register, 4),
            ],
            registers: vec![
                RegisterDef::new("R0", "register", 0, 32),
                RegisterDef::context("ctx", "register", 0x100, 8),
            ],
            context_fields: vec![ContextFieldDef::new("mode", 0, 1)],
        }
    }

    fn outcome(old: LanguageDefinition, new: LanguageDefinition) -> Feasibility {
        build_translator(
            Arc::new(LanguageDescriptor::from_definition(old).unwrap()),
            Arc::new(LanguageDescriptor::from_definition(new).unwrap()),
        )
    }

    #[test]
    fn identical_languages_build() {
        let result = outcome(definition(), definition());
        assert!(result.is_built());
        assert!(result.unsupported_reason().is_none());
        let translator = result.into_translator().unwrap();
        assert!(translator.context_field_map().unwrap().is_identity());
    }

    #[test]
    fn processor_and_endianness_must_match() {
        let mut other = definition();
        other.processor = "other".into();
        assert!(matches!(
            outcome(definition(), other).unsupported_reason(),
            Some(UnsupportedReason::ProcessorMismatch { .. })
        ));

        let mut big = definition();
        big.endianness = Endianness::Big;
        let result = outcome(definition(), big);
        assert_eq!(
            result.unsupported_reason().unwrap().to_string(),
            "endianness changed from little to big"
        );
    }

    #[test]
    fn missing_space_blocks_surviving_register() {
        let mut new = definition();
        new.spaces[1].name = "regs".into();
        for reg in &mut new.registers {
            reg.space = "regs".into();
        }
        let result = outcome(definition(), new);
        assert_eq!(
            result.unsupported_reason(),
            Some(&UnsupportedReason::UnmappedSpace {
                space: "register".into(),
                register: "R0".into()
            })
        );
    }

    #[test]
    fn missing_space_is_fine_when_nothing_survives() {
        let mut old = definition();
        old.spaces.push(AddressSpace::new("io", SpaceKind::Other, 2));
        old.registers.push(RegisterDef::new("PORT", "io", 0, 8));
        assert!(outcome(old, definition()).is_built());
    }

    #[test]
    fn space_kind_change_is_unsupported() {
        let mut new = definition();
        new.spaces[1].kind = SpaceKind::Ram;
        assert!(matches!(
            outcome(definition(), new).unsupported_reason(),
            Some(UnsupportedReason::SpaceKindChanged { .. })
        ));
    }

    #[test]
    fn space_kind_follows_the_counterpart() {
        let moved = |kind: SpaceKind| {
            let mut new = definition();
            new.spaces.push(AddressSpace::new("flags", kind, 4));
            new.registers[1].space = "flags".into();
            new
        };

        let result = outcome(definition(), moved(SpaceKind::Other));
        assert_eq!(
            result.unsupported_reason().unwrap().to_string(),
            "register 'ctx' was in a register space, now in 'flags' (other)"
        );

        let result = outcome(definition(), moved(SpaceKind::Register));
        let translator = result.translator().unwrap();
        let ctx = translator.old_context_register().unwrap();
        assert_eq!(translator.new_register(ctx).unwrap().space, "flags");
        assert!(translator.requires_value_translation(ctx));
    }

    #[test]
    fn narrowed_register_is_unsupported() {
        let mut new = definition();
        new.registers[0].bit_size = 16;
        let result = outcome(definition(), new);
        assert_eq!(
            result.unsupported_reason().unwrap().to_string(),
            "register 'R0' narrowed from 32 to 16 bits"
        );
    }

    #[test]
    fn context_relayout_is_unsupported() {
        let mut new = definition();
        new.context_fields = vec![ContextFieldDef::new("mode", 0, 2)];
        let result = outcome(definition(), new);
        let reason = result.unsupported_reason().unwrap();
        assert!(matches!(reason, UnsupportedReason::ContextLayout(_)));
        assert!(reason
            .to_string()
            .starts_with("context field layout not losslessly mappable"));
    }

    #[test]
    fn context_register_may_disappear() {
        let mut new = definition();
        new.registers.truncate(1);
        new.context_fields.clear();
        let result = outcome(definition(), new);
        let translator = result.translator().unwrap();
        assert!(translator.context_field_map().is_none());
        assert!(translator.new_context_register().is_none());
    }
}
