//! Compiler-spec id mapping.
//!
//! An old id maps to itself when the new language still declares it, and to
//! the new language's default otherwise. The rule is the composition of two
//! total functions, [`CompilerSpecMapper::lookup`] and
//! [`CompilerSpecMapper::or_default`].

use std::collections::HashSet;

use relang_model::{CompilerSpecId, LanguageDescriptor};

/// Maps compiler-spec ids into a new language.
#[derive(Debug, Clone)]
pub struct CompilerSpecMapper {
    known: HashSet<CompilerSpecId>,
    default: CompilerSpecId,
}

impl CompilerSpecMapper {
    /// Build a mapper targeting `new`.
    pub fn new(new: &LanguageDescriptor) -> Self {
        CompilerSpecMapper {
            known: new.compiler_specs().iter().map(|s| s.id.clone()).collect(),
            default: new.default_compiler_spec().id.clone(),
        }
    }

    /// The same id, if the new language declares it.
    pub fn lookup(&self, id: &CompilerSpecId) -> Option<CompilerSpecId> {
        self.known.get(id).cloned()
    }

    /// The given id, or the new language's default when there is none.
    pub fn or_default(&self, id: Option<CompilerSpecId>) -> CompilerSpecId {
        id.unwrap_or_else(|| self.default.clone())
    }

    /// Map an old id into the new language. Never fails.
    pub fn translate(&self, id: &CompilerSpecId) -> CompilerSpecId {
        self.or_default(self.lookup(id))
    }

    /// The new language's default compiler spec.
    pub fn default_id(&self) -> &CompilerSpecId {
        &self.default
    }
}
