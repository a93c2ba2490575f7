//! CLI command implementations.

pub mod check;
pub mod compiler_spec;
pub mod register;
pub mod translate;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use relang_model::{load_language, LanguageDescriptor};
use relang_translate::{build_translator, Feasibility, Translator};

/// Load a descriptor file into a shareable descriptor.
pub fn load(path: &Path) -> Result<Arc<LanguageDescriptor>> {
    let lang = load_language(path).with_context(|| format!("loading {}", path.display()))?;
    log::debug!("loaded {lang} from {}", path.display());
    Ok(Arc::new(lang))
}

/// Load both descriptors and decide feasibility.
pub fn feasibility(old: &Path, new: &Path) -> Result<Feasibility> {
    Ok(build_translator(load(old)?, load(new)?))
}

/// Load both descriptors and build a translator, failing if none exists.
pub fn translator(old: &Path, new: &Path) -> Result<Translator> {
    match feasibility(old, new)? {
        Feasibility::Built(translator) => Ok(translator),
        Feasibility::Unsupported(reason) => bail!("no automatic translation: {reason}"),
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal number.
pub fn parse_number(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

/// Parse a hex string into `len` bytes, most significant byte first.
///
/// Shorter input is zero-extended on the left; longer input must only
/// carry leading zeros.
pub fn parse_hex_bytes(s: &str, len: usize) -> Result<Vec<u8>> {
    let digits: String = s
        .trim()
        .trim_start_matches("0x")
        .chars()
        .filter(|c| *c != '_')
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("invalid hex string '{s}'");
    }
    let padded = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits
    };
    let mut bytes = Vec::with_capacity(padded.len() / 2);
    for i in (0..padded.len()).step_by(2) {
        bytes.push(u8::from_str_radix(&padded[i..i + 2], 16)?);
    }

    if bytes.len() > len {
        let extra = bytes.len() - len;
        if bytes[..extra].iter().any(|b| *b != 0) {
            bail!("hex string '{s}' does not fit in {len} bytes");
        }
        bytes.drain(..extra);
    } else {
        let mut out = vec![0; len - bytes.len()];
        out.extend(bytes);
        bytes = out;
    }
    Ok(bytes)
}

/// Render bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use super::*;

    /// Path of a shared x86 test fixture.
    pub(crate) fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../crates/relang-translate/tests/fixtures")
            .join(name)
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number("16"), Ok(16));
        assert_eq!(parse_number("0x10"), Ok(16));
        assert_eq!(parse_number("0X2000"), Ok(0x2000));
        assert!(parse_number("0xZZ").is_err());
        assert!(parse_number("-1").is_err());
    }

    #[test]
    fn hex_bytes() {
        assert_eq!(parse_hex_bytes("ff00ff00", 4).unwrap(), vec![0xff, 0, 0xff, 0]);
        assert_eq!(parse_hex_bytes("0x1", 2).unwrap(), vec![0, 1]);
        assert_eq!(parse_hex_bytes("abc", 2).unwrap(), vec![0x0a, 0xbc]);
        assert_eq!(parse_hex_bytes("0000ffff", 2).unwrap(), vec![0xff, 0xff]);
        assert!(parse_hex_bytes("ffff0000", 2).is_err());
        assert!(parse_hex_bytes("xyz", 2).is_err());
        assert!(parse_hex_bytes("", 2).is_err());
        assert_eq!(to_hex(&[0, 0xab, 0x10]), "00ab10");
    }

    #[test]
    fn unsupported_pair_fails_to_build() {
        let err = translator(&fixture("x86_v1.toml"), &fixture("x86_v3.toml")).unwrap_err();
        assert!(err.to_string().starts_with("no automatic translation"));
        assert!(translator(&fixture("x86_v1.toml"), &fixture("x86_v2.toml")).is_ok());
    }

    #[test]
    fn missing_descriptor_has_context() {
        let err = load(Path::new("/nonexistent/lang.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("loading /nonexistent/lang.toml"));
    }
}
