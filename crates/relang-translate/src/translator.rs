//! The automatic language translator.
//!
//! A [`Translator`] is built once per (old, new) language pair by
//! [`build_translator`](crate::build_translator) and is read-only afterwards.
//! Every operation is a pure lookup over its fixed tables, so one instance
//! can be shared across threads behind an `Arc`.

use std::sync::Arc;

use relang_model::{
    AddressSpace, CompilerSpecId, LanguageDescriptor, PartialRegisterValue, RegisterDescriptor,
};

use crate::compiler_spec::CompilerSpecMapper;
use crate::context::ContextFieldMap;
use crate::error::{Result, TranslateError};
use crate::registers::RegisterMapper;

/// Translates register references and values from an old language version
/// to a new one.
#[derive(Debug, Clone)]
pub struct Translator {
    old: Arc<LanguageDescriptor>,
    new: Arc<LanguageDescriptor>,
    registers: RegisterMapper,
    context: Option<ContextFieldMap>,
    compiler_specs: CompilerSpecMapper,
}

impl Translator {
    pub(crate) fn new(
        old: Arc<LanguageDescriptor>,
        new: Arc<LanguageDescriptor>,
        context: Option<ContextFieldMap>,
    ) -> Self {
        let context_changed = context.as_ref().is_some_and(|map| !map.is_identity());
        let registers = RegisterMapper::new(&old, &new, context_changed);
        let compiler_specs = CompilerSpecMapper::new(&new);
        Translator {
            old,
            new,
            registers,
            context,
            compiler_specs,
        }
    }

    /// The language being translated from.
    pub fn old_language(&self) -> &LanguageDescriptor {
        &self.old
    }

    /// The language being translated to.
    pub fn new_language(&self) -> &LanguageDescriptor {
        &self.new
    }

    /// The old register occupying exactly `length` bytes at `space:offset`.
    pub fn old_register_at(&self, space: &str, offset: u64, length: u64) -> Result<&RegisterDescriptor> {
        RegisterMapper::resolve_old(&self.old, space, offset, length)
    }

    /// The new counterpart of an old register, or `None` if it was removed.
    ///
    /// `old` must be a register of the old language.
    pub fn new_register(&self, old: &RegisterDescriptor) -> Option<&RegisterDescriptor> {
        self.registers
            .map(old.id)
            .and_then(|id| self.new.register_by_id(id))
    }

    /// The old language's processor-context register.
    pub fn old_context_register(&self) -> Option<&RegisterDescriptor> {
        self.old.context_register()
    }

    /// The new language's processor-context register.
    pub fn new_context_register(&self) -> Option<&RegisterDescriptor> {
        self.new.context_register()
    }

    /// Field correspondence between the two context registers, when both
    /// languages have one.
    pub fn context_field_map(&self) -> Option<&ContextFieldMap> {
        self.context.as_ref()
    }

    /// Whether values of `old` need more than a reinterpretation on the
    /// new register.
    pub fn requires_value_translation(&self, old: &RegisterDescriptor) -> bool {
        self.registers.requires_value_translation(old.id)
    }

    /// The new address space with this name.
    pub fn new_address_space(&self, name: &str) -> Result<&AddressSpace> {
        self.new
            .space(name)
            .ok_or_else(|| TranslateError::SpaceNotFound {
                name: name.to_string(),
            })
    }

    /// Translate a value of an old register into the new language.
    ///
    /// Returns `Ok(None)` when the register has no counterpart. Known bits
    /// keep their values; no unknown bit ever becomes known.
    pub fn translate_value(&self, value: &PartialRegisterValue) -> Result<Option<PartialRegisterValue>> {
        let old_reg = self
            .old
            .register_by_id(value.register())
            .ok_or(TranslateError::UnknownRegister {
                id: value.register(),
            })?;
        if value.width() != old_reg.bit_size {
            return Err(TranslateError::WidthMismatch {
                register: old_reg.name.clone(),
                expected: old_reg.bit_size,
                actual: value.width(),
            });
        }

        let Some(new_reg) = self.new_register(old_reg) else {
            log::trace!("register '{}' has no counterpart in {}", old_reg.name, self.new);
            return Ok(None);
        };

        if !self.requires_value_translation(old_reg) {
            return Ok(Some(value.reanchor(new_reg.id)));
        }

        if old_reg.context {
            return Ok(self.context.as_ref().map(|map| map.translate(value)));
        }

        Ok(Some(value.resized(new_reg.id, new_reg.bit_size)))
    }

    /// Translate a value and express it on the new register's base register.
    ///
    /// Bits of the base register outside the translated register are unknown.
    pub fn translate_base_value(&self, value: &PartialRegisterValue) -> Result<Option<PartialRegisterValue>> {
        Ok(self
            .translate_value(value)?
            .and_then(|translated| self.new.widen_to_base(&translated)))
    }

    /// Map an old compiler-spec id into the new language.
    pub fn translate_compiler_spec(&self, id: &CompilerSpecId) -> CompilerSpecId {
        self.compiler_specs.translate(id)
    }

    /// Number of old registers with a counterpart in the new language.
    pub fn mapped_register_count(&self) -> usize {
        self.registers.mapped_count()
    }
}

impl std::fmt::Display for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.old, self.new)
    }
}
