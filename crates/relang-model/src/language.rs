//! Language descriptors.
//!
//! A [`LanguageDefinition`] is the serialized form of one version of a
//! processor description. [`LanguageDescriptor::from_definition`] validates
//! it and resolves the register containment forest into an immutable
//! descriptor that the translation engine queries.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compiler::{CompilerSpecDescriptor, CompilerSpecId};
use crate::context::{ContextFieldDef, ContextFieldDescriptor};
use crate::error::{ModelError, Result};
use crate::fingerprint::Fingerprint;
use crate::parse::{validate_definition, Severity};
use crate::register::{resolve_registers, RegisterDef, RegisterDescriptor, RegisterId};
use crate::space::AddressSpace;
use crate::value::PartialRegisterValue;

/// Byte ordering of the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endianness {
    /// Lowest address holds the least-significant byte.
    Little,
    /// Lowest address holds the most-significant byte.
    Big,
}

impl std::fmt::Display for Endianness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endianness::Little => f.write_str("little"),
            Endianness::Big => f.write_str("big"),
        }
    }
}

/// Language identifier (e.g., "x86:LE:32:default").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(pub String);

impl LanguageId {
    /// Create an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        LanguageId(id.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `MAJOR.MINOR` language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl LanguageVersion {
    /// Create a version.
    pub fn new(major: u32, minor: u32) -> Self {
        LanguageVersion { major, minor }
    }
}

impl FromStr for LanguageVersion {
    type Err = ModelError;

    /// Parse "2" or "2.1".
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ModelError::InvalidVersion(s.to_string());
        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, "0"),
        };
        Ok(LanguageVersion {
            major: major.trim().parse().map_err(|_| invalid())?,
            minor: minor.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for LanguageVersion {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<LanguageVersion> for String {
    fn from(v: LanguageVersion) -> Self {
        v.to_string()
    }
}

impl std::fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Identifies one version of one language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionKey {
    /// Language identifier.
    pub id: LanguageId,
    /// Language version.
    pub version: LanguageVersion,
}

impl std::fmt::Display for VersionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (v{})", self.id, self.version)
    }
}

/// Serialized form of a language description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LanguageDefinition {
    /// Language identifier.
    pub id: LanguageId,
    /// Processor family (e.g., "x86").
    pub processor: String,
    /// Byte ordering.
    pub endianness: Endianness,
    /// Description version.
    pub version: LanguageVersion,
    /// Id of the default compiler spec; must name one of `compiler_specs`.
    pub default_compiler_spec: CompilerSpecId,
    /// Declared compiler specs.
    #[serde(default, rename = "compiler-spec")]
    pub compiler_specs: Vec<CompilerSpecDescriptor>,
    /// Address spaces.
    #[serde(default, rename = "space")]
    pub spaces: Vec<AddressSpace>,
    /// Registers, in declaration order.
    #[serde(default, rename = "register")]
    pub registers: Vec<RegisterDef>,
    /// Fields of the processor-context register.
    #[serde(default, rename = "context-field")]
    pub context_fields: Vec<ContextFieldDef>,
}

/// An immutable, validated language description.
#[derive(Debug, Clone)]
pub struct LanguageDescriptor {
    id: LanguageId,
    processor: String,
    endianness: Endianness,
    version: LanguageVersion,
    spaces: Vec<AddressSpace>,
    registers: Vec<RegisterDescriptor>,
    context_fields: Vec<ContextFieldDescriptor>,
    compiler_specs: Vec<CompilerSpecDescriptor>,
    default_compiler_spec: usize,
    fingerprint: Fingerprint,
}

impl LanguageDescriptor {
    /// Validate a definition and build the descriptor.
    ///
    /// Validation warnings (such as overlapping context fields) are allowed;
    /// any error-severity issue fails the load.
    pub fn from_definition(def: LanguageDefinition) -> Result<Self> {
        if let Err(issues) = validate_definition(&def) {
            let errors: Vec<String> = issues
                .iter()
                .filter(|issue| issue.severity == Severity::Error)
                .map(|issue| issue.message.clone())
                .collect();
            if !errors.is_empty() {
                return Err(ModelError::Validation {
                    detail: errors.join("; "),
                });
            }
        }

        let fingerprint = Fingerprint::compute(&serde_json::to_vec(&def)?);
        let registers = resolve_registers(&def.registers);
        let context_id = registers.iter().find(|r| r.context).map(|r| r.id);
        let context_fields = match context_id {
            Some(register) => def
                .context_fields
                .iter()
                .map(|field| ContextFieldDescriptor {
                    name: field.name.clone(),
                    range: field.range,
                    register,
                })
                .collect(),
            None => Vec::new(),
        };
        let default_compiler_spec = def
            .compiler_specs
            .iter()
            .position(|spec| spec.id == def.default_compiler_spec)
            .ok_or_else(|| ModelError::Validation {
                detail: format!(
                    "default compiler spec '{}' is not declared",
                    def.default_compiler_spec
                ),
            })?;

        Ok(LanguageDescriptor {
            id: def.id,
            processor: def.processor,
            endianness: def.endianness,
            version: def.version,
            spaces: def.spaces,
            registers,
            context_fields,
            compiler_specs: def.compiler_specs,
            default_compiler_spec,
            fingerprint,
        })
    }

    /// Language identifier.
    pub fn id(&self) -> &LanguageId {
        &self.id
    }

    /// Processor family.
    pub fn processor(&self) -> &str {
        &self.processor
    }

    /// Byte ordering.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Description version.
    pub fn version(&self) -> LanguageVersion {
        self.version
    }

    /// Cache key for this description.
    pub fn version_key(&self) -> VersionKey {
        VersionKey {
            id: self.id.clone(),
            version: self.version,
        }
    }

    /// Digest of the definition this descriptor was built from.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    // ---- Address spaces ----

    /// All address spaces.
    pub fn spaces(&self) -> &[AddressSpace] {
        &self.spaces
    }

    /// Look up an address space by name.
    pub fn space(&self, name: &str) -> Option<&AddressSpace> {
        self.spaces.iter().find(|s| s.name == name)
    }

    /// The default data space, if one is declared.
    pub fn default_space(&self) -> Option<&AddressSpace> {
        self.spaces.iter().find(|s| s.default)
    }

    // ---- Registers ----

    /// All registers, indexed by [`RegisterId`].
    pub fn registers(&self) -> &[RegisterDescriptor] {
        &self.registers
    }

    /// Look up a register by id.
    pub fn register_by_id(&self, id: RegisterId) -> Option<&RegisterDescriptor> {
        self.registers.get(id.0)
    }

    /// Look up a register by name.
    pub fn register(&self, name: &str) -> Option<&RegisterDescriptor> {
        self.registers.iter().find(|r| r.name == name)
    }

    /// The register occupying exactly `[offset, offset + byte_len)` in `space`.
    pub fn register_at(&self, space: &str, offset: u64, byte_len: u64) -> Option<&RegisterDescriptor> {
        self.registers
            .iter()
            .find(|r| r.has_span(space, offset, byte_len))
    }

    /// The parent of a register, if it has one.
    pub fn parent_of(&self, id: RegisterId) -> Option<&RegisterDescriptor> {
        self.register_by_id(id)
            .and_then(|r| r.parent)
            .and_then(|p| self.register_by_id(p))
    }

    /// The root of a register's containment tree (itself if it has no parent).
    pub fn base_register(&self, id: RegisterId) -> Option<&RegisterDescriptor> {
        let mut current = self.register_by_id(id)?;
        while let Some(parent) = current.parent.and_then(|p| self.register_by_id(p)) {
            current = parent;
        }
        Some(current)
    }

    /// Registers whose parent is `id`.
    pub fn children_of(&self, id: RegisterId) -> impl Iterator<Item = &RegisterDescriptor> {
        self.registers.iter().filter(move |r| r.parent == Some(id))
    }

    /// Whether `ancestor` is `id` or one of its (transitive) parents.
    pub fn is_ancestor_or_self(&self, ancestor: RegisterId, id: RegisterId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.register_by_id(cur).and_then(|r| r.parent);
        }
        false
    }

    /// Position of `child`'s least-significant bit inside `ancestor`'s value.
    ///
    /// Returns `None` unless `ancestor` is `child` or contains it.
    pub fn bit_shift_within(&self, child: RegisterId, ancestor: RegisterId) -> Option<u32> {
        if !self.is_ancestor_or_self(ancestor, child) {
            return None;
        }
        let c = self.register_by_id(child)?;
        let a = self.register_by_id(ancestor)?;
        let bytes = match self.endianness {
            Endianness::Little => c.offset - a.offset,
            Endianness::Big => a.last_byte() - c.last_byte(),
        };
        u32::try_from(bytes * 8).ok()
    }

    /// Express a value on its register's base register.
    ///
    /// Bits of the base register outside the original register are unknown.
    /// Returns `None` if the value's register is not part of this description.
    pub fn widen_to_base(&self, value: &PartialRegisterValue) -> Option<PartialRegisterValue> {
        let base = self.base_register(value.register())?;
        let shift = self.bit_shift_within(value.register(), base.id)?;
        Some(value.placed(base.id, base.bit_size, shift))
    }

    /// Extract the value of `register` from a value over one of its ancestors.
    ///
    /// Returns `None` if `register` is not contained in the value's register.
    pub fn narrow(&self, value: &PartialRegisterValue, register: RegisterId) -> Option<PartialRegisterValue> {
        let target = self.register_by_id(register)?;
        let shift = self.bit_shift_within(register, value.register())?;
        Some(value.extracted(register, target.bit_size, shift))
    }

    // ---- Processor context ----

    /// The processor-context register, if the description has one.
    pub fn context_register(&self) -> Option<&RegisterDescriptor> {
        self.registers.iter().find(|r| r.context)
    }

    /// Fields of the processor-context register.
    pub fn context_fields(&self) -> &[ContextFieldDescriptor] {
        &self.context_fields
    }

    /// Look up a context field by name.
    pub fn context_field(&self, name: &str) -> Option<&ContextFieldDescriptor> {
        self.context_fields.iter().find(|f| f.name == name)
    }

    // ---- Compiler specs ----

    /// All compiler specs.
    pub fn compiler_specs(&self) -> &[CompilerSpecDescriptor] {
        &self.compiler_specs
    }

    /// Look up a compiler spec by id.
    pub fn compiler_spec(&self, id: &CompilerSpecId) -> Option<&CompilerSpecDescriptor> {
        self.compiler_specs.iter().find(|s| &s.id == id)
    }

    /// The declared default compiler spec.
    pub fn default_compiler_spec(&self) -> &CompilerSpecDescriptor {
        &self.compiler_specs[self.default_compiler_spec]
    }
}

impl std::fmt::Display for LanguageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (v{})", self.id, self.version)
    }
}
