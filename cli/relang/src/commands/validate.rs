//! `relang validate`: check a descriptor file for structural problems.

use std::path::Path;

use anyhow::{bail, Context, Result};
use relang_model::{load_language_toml, validate_definition, Severity};

/// Validate a descriptor file and print every issue found.
pub fn run(path: &Path) -> Result<()> {
    let def =
        load_language_toml(path).with_context(|| format!("reading {}", path.display()))?;

    match validate_definition(&def) {
        Ok(()) => {
            println!("{} (v{}): OK", def.id, def.version);
            println!(
                "  {} spaces, {} registers, {} context fields, {} compiler specs",
                def.spaces.len(),
                def.registers.len(),
                def.context_fields.len(),
                def.compiler_specs.len()
            );
            Ok(())
        }
        Err(issues) => {
            let errors = issues
                .iter()
                .filter(|i| i.severity == Severity::Error)
                .count();
            for issue in &issues {
                println!("  {}: {}", issue.severity, issue.message);
            }
            if errors > 0 {
                bail!("{} has {errors} error(s)", path.display());
            }
            println!("{} (v{}): OK with warnings", def.id, def.version);
            Ok(())
        }
    }
}
