//! TOML parsing, serialization, and validation for language definitions.
//!
//! Language definitions are stored as TOML files with kebab-case keys, one
//! file per language version. This module loads them, validates their
//! structural invariants, and writes them back out.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{ModelError, Result};
use crate::language::{LanguageDefinition, LanguageDescriptor};

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The definition cannot be loaded.
    Error,
    /// The definition loads, but something is suspicious.
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A validation issue found in a language definition.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    fn error(message: String) -> Self {
        ValidationIssue {
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        ValidationIssue {
            severity: Severity::Warning,
            message,
        }
    }
}

/// Load a language definition from a TOML file.
pub fn load_language_toml(path: &Path) -> Result<LanguageDefinition> {
    if !path.exists() {
        return Err(ModelError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_language_toml(&content)
}

/// Parse a language definition from a TOML string.
pub fn parse_language_toml(toml_str: &str) -> Result<LanguageDefinition> {
    let definition: LanguageDefinition = toml::from_str(toml_str)?;
    Ok(definition)
}

/// Load, validate, and resolve a language descriptor from a TOML file.
pub fn load_language(path: &Path) -> Result<LanguageDescriptor> {
    LanguageDescriptor::from_definition(load_language_toml(path)?)
}

/// Serialize a language definition to pretty TOML.
pub fn language_to_toml(definition: &LanguageDefinition) -> Result<String> {
    let toml_str = toml::to_string_pretty(definition)?;
    Ok(toml_str)
}

/// Validate a language definition for structural correctness.
///
/// Returns `Ok(())` if no issues were found, or `Err(issues)` with every
/// problem, warnings included. Only error-severity issues prevent loading.
pub fn validate_definition(def: &LanguageDefinition) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    // 1. Identity
    if def.id.as_str().trim().is_empty() {
        issues.push(ValidationIssue::error("language id is empty".into()));
    }
    if def.processor.trim().is_empty() {
        issues.push(ValidationIssue::error("processor is empty".into()));
    }

    // 2. Compiler specs: unique ids, declared default
    let mut spec_ids = HashSet::new();
    for spec in &def.compiler_specs {
        if !spec_ids.insert(&spec.id) {
            issues.push(ValidationIssue::error(format!(
                "compiler spec '{}' declared more than once",
                spec.id
            )));
        }
    }
    if !spec_ids.contains(&def.default_compiler_spec) {
        issues.push(ValidationIssue::error(format!(
            "default compiler spec '{}' is not declared",
            def.default_compiler_spec
        )));
    }

    // 3. Address spaces: unique names, at most one default, sane sizes
    let mut space_names = HashSet::new();
    for space in &def.spaces {
        if !space_names.insert(space.name.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "address space '{}' declared more than once",
                space.name
            )));
        }
        if space.size == 0 || space.size > 8 {
            issues.push(ValidationIssue::error(format!(
                "address space '{}' has size {} (expected 1..=8 bytes)",
                space.name, space.size
            )));
        }
    }
    if def.spaces.iter().filter(|s| s.default).count() > 1 {
        issues.push(ValidationIssue::error(
            "more than one address space is marked default".into(),
        ));
    }

    // 4. Registers: unique names, known spaces, non-zero size, in bounds
    let mut register_names = HashSet::new();
    for reg in &def.registers {
        if !register_names.insert(reg.name.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "register '{}' declared more than once",
                reg.name
            )));
        }
        if reg.bit_size == 0 {
            issues.push(ValidationIssue::error(format!(
                "register '{}' has bit size 0",
                reg.name
            )));
        }
        match def.spaces.iter().find(|s| s.name == reg.space) {
            None => issues.push(ValidationIssue::error(format!(
                "register '{}' references unknown address space '{}'",
                reg.name, reg.space
            ))),
            Some(space) => {
                let last = reg.offset.checked_add(reg.byte_len().saturating_sub(1));
                if last.map_or(true, |last| last > space.max_offset()) {
                    issues.push(ValidationIssue::error(format!(
                        "register '{}' at 0x{:X} does not fit in address space '{}'",
                        reg.name, reg.offset, space.name
                    )));
                }
            }
        }
    }

    // 5. At most one processor-context register
    let contexts: Vec<_> = def.registers.iter().filter(|r| r.context).collect();
    if contexts.len() > 1 {
        issues.push(ValidationIssue::error(format!(
            "{} registers are marked as processor context (expected at most one)",
            contexts.len()
        )));
    }

    // 6. Registers in one space are disjoint or nested, never identical
    let regs = &def.registers;
    for i in 0..regs.len() {
        for j in (i + 1)..regs.len() {
            let (a, b) = (&regs[i], &regs[j]);
            if a.space != b.space || a.bit_size == 0 || b.bit_size == 0 {
                continue;
            }
            // Inclusive last bytes, representable at the top of a 64-bit space.
            let a_last = a.offset.saturating_add(a.byte_len() - 1);
            let b_last = b.offset.saturating_add(b.byte_len() - 1);
            let overlap = a.offset <= b_last && b.offset <= a_last;
            let nested = (a.offset <= b.offset && b_last <= a_last)
                || (b.offset <= a.offset && a_last <= b_last);
            if a.offset == b.offset && a_last == b_last {
                issues.push(ValidationIssue::error(format!(
                    "registers '{}' and '{}' occupy the same bytes",
                    a.name, b.name
                )));
            } else if overlap && !nested {
                issues.push(ValidationIssue::error(format!(
                    "registers '{}' (0x{:X}..=0x{:X}) and '{}' (0x{:X}..=0x{:X}) partially overlap",
                    a.name, a.offset, a_last, b.name, b.offset, b_last
                )));
            }
        }
    }

    // 7. Context fields
    let fields = &def.context_fields;
    match contexts.first() {
        None if !fields.is_empty() => issues.push(ValidationIssue::error(
            "context fields declared without a processor-context register".into(),
        )),
        None => {}
        Some(ctx) => {
            let mut field_names = HashSet::new();
            for field in fields {
                if !field_names.insert(field.name.as_str()) {
                    issues.push(ValidationIssue::error(format!(
                        "context field '{}' declared more than once",
                        field.name
                    )));
                }
                if field.range.lo > field.range.hi {
                    issues.push(ValidationIssue::error(format!(
                        "context field '{}' has inverted range {}",
                        field.name, field.range
                    )));
                } else if field.range.hi >= ctx.bit_size {
                    issues.push(ValidationIssue::error(format!(
                        "context field '{}' range {} exceeds the {}-bit context register",
                        field.name, field.range, ctx.bit_size
                    )));
                }
            }
            for i in 0..fields.len() {
                for j in (i + 1)..fields.len() {
                    if fields[i].range.overlaps(&fields[j].range) {
                        issues.push(ValidationIssue::warning(format!(
                            "context fields '{}' {} and '{}' {} overlap",
                            fields[i].name, fields[i].range, fields[j].name, fields[j].range
                        )));
                    }
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
