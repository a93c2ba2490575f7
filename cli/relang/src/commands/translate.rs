//! `relang translate`: carry a partial register value into the new version.

use std::path::Path;

use anyhow::{anyhow, Result};
use relang_model::PartialRegisterValue;
use relang_translate::Translator;

use super::{parse_hex_bytes, to_hex};

/// Build the old value of `register` from hex mask and value strings and
/// translate it. `Ok(None)` means the register was removed.
pub fn translate(
    t: &Translator,
    register: &str,
    mask: &str,
    value: &str,
    base: bool,
) -> Result<Option<PartialRegisterValue>> {
    let reg = t
        .old_language()
        .register(register)
        .ok_or_else(|| anyhow!("register '{register}' not found in {}", t.old_language()))?;
    let len = usize::try_from(reg.byte_len())?;
    let old_value = PartialRegisterValue::from_bytes(
        reg.id,
        reg.bit_size,
        &parse_hex_bytes(mask, len)?,
        &parse_hex_bytes(value, len)?,
    )?;
    log::debug!("translating {old_value} ({})", old_value.to_hex_pattern());

    let out = if base {
        t.translate_base_value(&old_value)?
    } else {
        t.translate_value(&old_value)?
    };
    Ok(out)
}

/// Translate a value given on the command line and print the result.
pub fn run(
    old: &Path,
    new: &Path,
    register: &str,
    mask: &str,
    value: &str,
    base: bool,
    format: Option<&str>,
) -> Result<()> {
    let t = super::translator(old, new)?;
    let out = translate(&t, register, mask, value, base)?;
    let name = |v: &PartialRegisterValue| {
        t.new_language()
            .register_by_id(v.register())
            .map(|r| r.name.clone())
            .unwrap_or_default()
    };

    match format {
        Some("json") => {
            let json = match &out {
                Some(v) => serde_json::json!({
                    "register": name(v),
                    "width": v.width(),
                    "mask": to_hex(&v.mask_bytes()),
                    "value": to_hex(&v.value_bytes()),
                    "pattern": v.to_hex_pattern(),
                }),
                None => serde_json::Value::Null,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => match &out {
            Some(v) => {
                println!("register: {} ({} bits)", name(v), v.width());
                println!("mask:     {}", to_hex(&v.mask_bytes()));
                println!("value:    {}", to_hex(&v.value_bytes()));
                println!("pattern:  {}", v.to_hex_pattern());
            }
            None => println!("register '{register}' has no counterpart in {}", t.new_language()),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::fixture;

    fn v1_to_v2() -> Translator {
        super::super::translator(&fixture("x86_v1.toml"), &fixture("x86_v2.toml")).unwrap()
    }

    #[test]
    fn eax_widened_to_rax() {
        let t = v1_to_v2();
        let out = translate(&t, "EAX", "ff00ff00", "78003400", true)
            .unwrap()
            .unwrap();
        assert_eq!(t.new_language().register_by_id(out.register()).unwrap().name, "RAX");
        assert_eq!(to_hex(&out.mask_bytes()), "00000000ff00ff00");
        assert_eq!(to_hex(&out.value_bytes()), "0000000078003400");
    }

    #[test]
    fn eax_on_its_own_register() {
        let t = v1_to_v2();
        let out = translate(&t, "EAX", "ff00ff00", "78003400", false)
            .unwrap()
            .unwrap();
        assert_eq!(out.width(), 32);
        assert_eq!(out.to_hex_pattern(), "78xx34xx");
    }

    #[test]
    fn bad_input_is_rejected() {
        let t = v1_to_v2();
        assert!(translate(&t, "NOPE", "ff", "ff", false).is_err());
        assert!(translate(&t, "AL", "fff", "0", false).is_err());
        assert!(translate(&t, "AL", "zz", "0", false).is_err());
    }

    #[test]
    fn run_prints_json() {
        assert!(run(
            &fixture("x86_v1.toml"),
            &fixture("x86_v2.toml"),
            "XX",
            "ffff",
            "1234",
            false,
            Some("json"),
        )
        .is_ok());
    }
}
