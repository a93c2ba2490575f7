//! `relang register`: map one old register span into the new version.

use std::path::Path;

use anyhow::Result;
use relang_model::RegisterDescriptor;
use relang_translate::Translator;

/// The outcome of mapping one register.
#[derive(Debug)]
pub struct RegisterReport<'a> {
    pub old: &'a RegisterDescriptor,
    pub new: Option<&'a RegisterDescriptor>,
    pub new_parent: Option<&'a RegisterDescriptor>,
    pub requires_value_translation: bool,
}

/// Resolve the old register at `space:offset` and find its counterpart.
pub fn lookup<'a>(
    t: &'a Translator,
    space: &str,
    offset: u64,
    length: u64,
) -> Result<RegisterReport<'a>> {
    let old = t.old_register_at(space, offset, length)?;
    let new = t.new_register(old);
    Ok(RegisterReport {
        old,
        new,
        new_parent: new.and_then(|n| t.new_language().parent_of(n.id)),
        requires_value_translation: t.requires_value_translation(old),
    })
}

/// Print where the register at `space:offset` lives in the new version.
pub fn run(
    old: &Path,
    new: &Path,
    space: &str,
    offset: u64,
    length: u64,
    format: Option<&str>,
) -> Result<()> {
    let t = super::translator(old, new)?;
    let report = lookup(&t, space, offset, length)?;

    match format {
        Some("json") => {
            let json = serde_json::json!({
                "old": describe_json(report.old),
                "new": report.new.map(describe_json),
                "new_parent": report.new_parent.map(|p| p.name.clone()),
                "requires_value_translation": report.requires_value_translation,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            println!("old: {}", describe(report.old));
            match report.new {
                Some(reg) => {
                    println!("new: {}", describe(reg));
                    if let Some(parent) = report.new_parent {
                        println!("     parent {}", parent.name);
                    }
                    println!(
                        "value translation required: {}",
                        if report.requires_value_translation { "yes" } else { "no" }
                    );
                }
                None => println!("new: (removed)"),
            }
        }
    }
    Ok(())
}

fn describe(reg: &RegisterDescriptor) -> String {
    let kind = if reg.context { " context" } else { "" };
    format!(
        "{} {}:0x{:X} ({} bits{kind})",
        reg.name, reg.space, reg.offset, reg.bit_size
    )
}

fn describe_json(reg: &RegisterDescriptor) -> serde_json::Value {
    serde_json::json!({
        "name": reg.name,
        "space": reg.space,
        "offset": reg.offset,
        "bit_size": reg.bit_size,
        "context": reg.context,
    })
}
