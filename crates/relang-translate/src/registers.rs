//! Register schema mapping.
//!
//! Old registers are matched to new registers by name; the processor-context
//! register is matched by role. For every old register the mapper also
//! records whether its layout or hierarchy changed, which decides whether
//! its values can be carried over as-is.

use relang_model::{LanguageDescriptor, RegisterDescriptor, RegisterId};

use crate::error::{Result, TranslateError};

/// Old-to-new register correspondence for one language pair.
#[derive(Debug, Clone)]
pub struct RegisterMapper {
    forward: Vec<Option<RegisterId>>,
    changed: Vec<bool>,
}

impl RegisterMapper {
    /// Match every old register against `new`.
    ///
    /// `context_layout_changed` reports whether the context field layouts
    /// differ; it only affects the context register.
    pub fn new(old: &LanguageDescriptor, new: &LanguageDescriptor, context_layout_changed: bool) -> Self {
        let forward: Vec<Option<RegisterId>> = old
            .registers()
            .iter()
            .map(|reg| counterpart(new, reg).map(|n| n.id))
            .collect();
        let changed = old
            .registers()
            .iter()
            .zip(&forward)
            .map(|(reg, mapped)| match mapped.and_then(|id| new.register_by_id(id)) {
                Some(new_reg) => {
                    layout_changed(old, reg, new, new_reg) || (reg.context && context_layout_changed)
                }
                None => false,
            })
            .collect();
        RegisterMapper { forward, changed }
    }

    /// The register of `old` occupying exactly the given span.
    ///
    /// Overlapping or partially matching registers do not count.
    pub fn resolve_old<'a>(
        old: &'a LanguageDescriptor,
        space: &str,
        offset: u64,
        length: u64,
    ) -> Result<&'a RegisterDescriptor> {
        old.register_at(space, offset, length)
            .ok_or_else(|| TranslateError::RegisterNotFound {
                space: space.to_string(),
                offset,
                length,
            })
    }

    /// The new register corresponding to an old one, if it still exists.
    pub fn map(&self, old: RegisterId) -> Option<RegisterId> {
        self.forward.get(old.index()).copied().flatten()
    }

    /// Whether values of an old register need more than a reinterpretation.
    ///
    /// Registers without a counterpart report `false`.
    pub fn requires_value_translation(&self, old: RegisterId) -> bool {
        self.changed.get(old.index()).copied().unwrap_or(false)
    }

    /// Number of old registers that survive into the new language.
    pub fn mapped_count(&self) -> usize {
        self.forward.iter().filter(|m| m.is_some()).count()
    }
}

/// Find `reg`'s counterpart in `new`: by role for the context register,
/// by name otherwise.
///
/// The context register may be renamed between versions and still map. An
/// ordinary register never maps onto the new context register, even when
/// their names match.
pub(crate) fn counterpart<'a>(new: &'a LanguageDescriptor, reg: &RegisterDescriptor) -> Option<&'a RegisterDescriptor> {
    if reg.context {
        new.context_register()
    } else {
        new.register(&reg.name).filter(|n| !n.context)
    }
}

fn layout_changed(
    old: &LanguageDescriptor,
    o: &RegisterDescriptor,
    new: &LanguageDescriptor,
    n: &RegisterDescriptor,
) -> bool {
    if o.space != n.space || o.offset != n.offset || o.bit_size != n.bit_size {
        return true;
    }
    match (old.parent_of(o.id), new.parent_of(n.id)) {
        (None, None) => false,
        (Some(op), Some(np)) => {
            op.name != np.name || op.offset != np.offset || op.bit_size != np.bit_size
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use relang_model::{
        AddressSpace, CompilerSpecDescriptor, CompilerSpecId, Endianness, LanguageDefinition,
        LanguageId, LanguageVersion, RegisterDef, SpaceKind,
    };

    use super::*;

    fn language(registers: Vec<RegisterDef>) -> LanguageDescriptor {
        LanguageDescriptor::from_definition(LanguageDefinition {
            id: LanguageId::new("toy:LE:32:default"),
            processor: "toy".into(),
            endianness: Endianness::Little,
            version: LanguageVersion::new(1, 0),
            default_compiler_spec: CompilerSpecId::new("default"),
            compiler_specs: vec![CompilerSpecDescriptor::named("default")],
            spaces: vec![AddressSpace::new("register", SpaceKind::Register, 4)],
            registers,
            context_fields: Vec::new(),
        })
        .unwrap()
    }

    fn old_lang() -> LanguageDescriptor {
        language(vec![
            RegisterDef::new("EAX", "register", 0, 32),
            RegisterDef::new("AX", "register", 0, 16),
            RegisterDef::new("PC", "register", 0x40, 32),
            RegisterDef::new("GONE", "register", 0x50, 8),
            RegisterDef::context("ctx", "register", 0x100, 8),
        ])
    }

    #[test]
    fn resolve_requires_exact_span() {
        let old = old_lang();
        assert_eq!(RegisterMapper::resolve_old(&old, "register", 0, 4).unwrap().name, "EAX");
        assert_eq!(RegisterMapper::resolve_old(&old, "register", 0, 2).unwrap().name, "AX");
        let err = RegisterMapper::resolve_old(&old, "register", 0, 3).unwrap_err();
        assert_eq!(
            err,
            TranslateError::RegisterNotFound {
                space: "register".into(),
                offset: 0,
                length: 3
            }
        );
        assert!(RegisterMapper::resolve_old(&old, "ram", 0, 4).is_err());
    }

    #[test]
    fn maps_by_name_and_context_by_role() {
        let old = old_lang();
        let new = language(vec![
            RegisterDef::context("context", "register", 0x200, 8),
            RegisterDef::new("PC", "register", 0x40, 32),
            RegisterDef::new("EAX", "register", 0, 32),
            RegisterDef::new("AX", "register", 0, 16),
        ]);
        let mapper = RegisterMapper::new(&old, &new, false);
        let name = |id: RegisterId| mapper.map(id).map(|n| new.register_by_id(n).unwrap().name.clone());
        assert_eq!(name(RegisterId(0)).as_deref(), Some("EAX"));
        assert_eq!(name(RegisterId(3)), None);
        assert_eq!(name(RegisterId(4)).as_deref(), Some("context"));
        assert_eq!(mapper.mapped_count(), 4);
        assert_eq!(mapper.map(RegisterId(99)), None);
    }

    #[test]
    fn unchanged_registers_need_no_translation() {
        let old = old_lang();
        let new = language(vec![
            RegisterDef::new("RAX", "register", 0, 64),
            RegisterDef::new("EAX", "register", 0, 32),
            RegisterDef::new("AX", "register", 0, 16),
            RegisterDef::new("PC", "register", 0x40, 32),
            RegisterDef::context("ctx", "register", 0x100, 8),
        ]);
        let mapper = RegisterMapper::new(&old, &new, false);
        // EAX gained a parent; AX's parent is still EAX.
        assert!(mapper.requires_value_translation(RegisterId(0)));
        assert!(!mapper.requires_value_translation(RegisterId(1)));
        assert!(!mapper.requires_value_translation(RegisterId(2)));
        // Removed register has nothing to translate into.
        assert!(!mapper.requires_value_translation(RegisterId(3)));
        assert!(!mapper.requires_value_translation(RegisterId(4)));

        let relaid = RegisterMapper::new(&old, &new, true);
        assert!(relaid.requires_value_translation(RegisterId(4)));
        assert!(!relaid.requires_value_translation(RegisterId(2)));
    }

    #[test]
    fn moved_or_resized_registers_need_translation() {
        let old = old_lang();
        let new = language(vec![
            RegisterDef::new("EAX", "register", 0, 32),
            RegisterDef::new("AX", "register", 2, 16),
            RegisterDef::new("PC", "register", 0x40, 64),
        ]);
        let mapper = RegisterMapper::new(&old, &new, false);
        assert!(!mapper.requires_value_translation(RegisterId(0)));
        assert!(mapper.requires_value_translation(RegisterId(1)));
        assert!(mapper.requires_value_translation(RegisterId(2)));
    }

    #[test]
    fn context_register_maps_by_role_not_name() {
        let old = language(vec![
            RegisterDef::new("mode", "register", 0, 8),
            RegisterDef::context("ctx", "register", 0x100, 8),
        ]);
        let new = language(vec![
            RegisterDef::context("mode", "register", 0x100, 8),
            RegisterDef::new("ctx", "register", 0x10, 8),
        ]);
        let mapper = RegisterMapper::new(&old, &new, false);
        // Old "mode" only finds a context register of that name: absent.
        assert_eq!(mapper.map(RegisterId(0)), None);
        // The renamed context register still maps, onto new "mode".
        assert_eq!(mapper.map(RegisterId(1)), Some(RegisterId(0)));
        assert!(!mapper.requires_value_translation(RegisterId(1)));
    }
}
