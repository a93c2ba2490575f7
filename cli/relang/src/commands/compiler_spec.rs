//! `relang compiler-spec`: map a compiler-spec id into the new version.

use std::path::Path;

use anyhow::Result;
use relang_model::CompilerSpecId;

/// Print the new compiler-spec id for `id`.
pub fn run(old: &Path, new: &Path, id: &str) -> Result<()> {
    let t = super::translator(old, new)?;
    let id = CompilerSpecId::new(id);
    if t.old_language().compiler_spec(&id).is_none() {
        log::warn!("compiler spec '{id}' is not declared by {}", t.old_language());
    }
    let mapped = t.translate_compiler_spec(&id);
    if mapped == id {
        println!("{mapped}");
    } else {
        println!("{mapped} (fallback to default of {})", t.new_language());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::fixture;

    #[test]
    fn maps_known_and_removed_ids() {
        let (old, new) = (fixture("x86_v1.toml"), fixture("x86_v2.toml"));
        assert!(run(&old, &new, "xyz").is_ok());
        assert!(run(&old, &new, "123").is_ok());
        assert!(run(&old, &new, "unknown").is_ok());
    }

    #[test]
    fn unsupported_pair_fails() {
        assert!(run(&fixture("x86_v1.toml"), &fixture("x86_v3.toml"), "abc").is_err());
    }
}
