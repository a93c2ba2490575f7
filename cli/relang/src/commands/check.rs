//! `relang check`: report whether two versions translate automatically.

use std::path::Path;

use anyhow::{bail, Result};
use relang_translate::{Feasibility, Translator};

/// Decide feasibility for `old -> new` and print a summary.
pub fn run(old: &Path, new: &Path, format: Option<&str>) -> Result<()> {
    let outcome = super::feasibility(old, new)?;

    match format {
        Some("json") => {
            let json = match &outcome {
                Feasibility::Built(t) => serde_json::json!({
                    "old": t.old_language().to_string(),
                    "new": t.new_language().to_string(),
                    "supported": true,
                    "mapped_registers": t.mapped_register_count(),
                    "registers": register_rows(t),
                }),
                Feasibility::Unsupported(reason) => serde_json::json!({
                    "supported": false,
                    "reason": reason.to_string(),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            if let Feasibility::Built(t) = &outcome {
                print_summary(t);
            }
        }
    }

    if let Feasibility::Unsupported(reason) = outcome {
        bail!("no automatic translation: {reason}");
    }
    Ok(())
}

fn register_rows(t: &Translator) -> Vec<serde_json::Value> {
    t.old_language()
        .registers()
        .iter()
        .map(|reg| {
            serde_json::json!({
                "name": reg.name,
                "new": t.new_register(reg).map(|n| n.name.clone()),
                "requires_value_translation": t.requires_value_translation(reg),
            })
        })
        .collect()
}

fn print_summary(t: &Translator) {
    println!("{t}: supported");
    println!(
        "  {} of {} registers mapped",
        t.mapped_register_count(),
        t.old_language().registers().len()
    );
    for reg in t.old_language().registers() {
        match t.new_register(reg) {
            None => println!("  {:<12} removed", reg.name),
            Some(new_reg) if t.requires_value_translation(reg) => println!(
                "  {:<12} -> {} (0x{:X}, {} bits), value translation required",
                reg.name, new_reg.name, new_reg.offset, new_reg.bit_size
            ),
            Some(_) => {}
        }
    }
    if let Some(map) = t.context_field_map() {
        for name in map.dropped_fields() {
            println!("  context field '{name}' dropped");
        }
        for name in map.added_fields() {
            println!("  context field '{name}' added");
        }
        for m in map.mappings().iter().filter(|m| !m.is_unmoved()) {
            println!("  context field '{}' moved {} -> {}", m.name, m.old, m.new);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::fixture;

    #[test]
    fn supported_pair() {
        assert!(run(&fixture("x86_v1.toml"), &fixture("x86_v2.toml"), None).is_ok());
        assert!(run(&fixture("x86_v1.toml"), &fixture("x86_v2.toml"), Some("json")).is_ok());
    }

    #[test]
    fn unsupported_pair_fails() {
        let err = run(&fixture("x86_v1.toml"), &fixture("x86_v3.toml"), Some("json")).unwrap_err();
        assert!(err.to_string().contains("context field layout"));
    }

    #[test]
    fn rows_cover_every_old_register() {
        let t = super::super::translator(&fixture("x86_v1.toml"), &fixture("x86_v2.toml")).unwrap();
        let rows = register_rows(&t);
        assert_eq!(rows.len(), t.old_language().registers().len());
        let eax = rows.iter().find(|r| r["name"] == "EAX").unwrap();
        assert_eq!(eax["new"], "EAX");
        assert_eq!(eax["requires_value_translation"], true);
        let ctx = rows.iter().find(|r| r["name"] == "contextreg").unwrap();
        assert_eq!(ctx["requires_value_translation"], false);
    }
}
