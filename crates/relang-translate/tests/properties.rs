//! Property tests over the x86 test language fixtures.

use std::sync::Arc;

use proptest::prelude::*;
use relang_model::{
    parse_language_toml, BitRange, CompilerSpecId, LanguageDescriptor, PartialRegisterValue,
};
use relang_translate::{build_translator, Translator};

const V1: &str = include_str!("fixtures/x86_v1.toml");
const V2: &str = include_str!("fixtures/x86_v2.toml");

fn load(text: &str) -> Arc<LanguageDescriptor> {
    let def = parse_language_toml(text).unwrap();
    Arc::new(LanguageDescriptor::from_definition(def).unwrap())
}

fn translator(old: &str, new: &str) -> Translator {
    build_translator(load(old), load(new))
        .into_translator()
        .unwrap()
}

fn register_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["EAX", "AX", "AL", "AH", "XX", "XL"])
}

proptest! {
    #[test]
    fn same_version_is_identity(name in register_name(), mask in any::<u32>(), value in any::<u32>()) {
        let t = translator(V1, V1);
        let reg = t.old_language().register(name).unwrap();
        let width = reg.bit_size;
        let keep = if width == 32 { u32::MAX } else { (1u32 << width) - 1 };
        let mut v = PartialRegisterValue::unknown(reg.id, width);
        for bit in 0..width {
            if (mask & keep) >> bit & 1 == 1 {
                v = v.with_bit(bit, Some((value >> bit) & 1 == 1));
            }
        }
        let out = t.translate_value(&v).unwrap().unwrap();
        prop_assert_eq!(out.to_bytes(), v.to_bytes());
        prop_assert_eq!(out.register(), t.new_register(reg).unwrap().id);
    }

    #[test]
    fn upgrade_preserves_known_bits(mask in any::<[u8; 4]>(), value in any::<[u8; 4]>()) {
        let t = translator(V1, V2);
        let eax = t.old_language().register("EAX").unwrap();
        let v = PartialRegisterValue::from_bytes(eax.id, 32, &mask, &value).unwrap();

        let out = t.translate_value(&v).unwrap().unwrap();
        prop_assert_eq!(out.known_bit_count(), v.known_bit_count());
        for bit in 0..32 {
            prop_assert_eq!(out.bit(bit), v.bit(bit));
        }

        let base = t.translate_base_value(&v).unwrap().unwrap();
        prop_assert_eq!(base.width(), 64);
        prop_assert_eq!(base.known_bit_count(), v.known_bit_count());
        let (base_mask, mask) = (base.mask_bytes(), v.mask_bytes());
        prop_assert_eq!(&base_mask[4..], &mask[..]);
    }

    #[test]
    fn context_fields_survive_upgrade(
        a in prop::option::of(0u64..2),
        b in prop::option::of(0u64..2),
        c in prop::option::of(0u64..4),
    ) {
        let t = translator(V1, V2);
        let lang = t.old_language();
        let ctx = lang.context_register().unwrap();
        let mut v = PartialRegisterValue::unknown(ctx.id, ctx.bit_size);
        for (name, field) in [("a", a), ("b", b), ("c", c)] {
            if let Some(bits) = field {
                v = v.with_bits(lang.context_field(name).unwrap().range, bits);
            }
        }
        let out = t.translate_value(&v).unwrap().unwrap();
        prop_assert_eq!(out.to_bytes(), v.to_bytes());
        prop_assert_eq!(out.bits(BitRange::new(2, 3)), c);
    }

    #[test]
    fn compiler_specs_always_land_in_new_language(id in "[a-z0-9]{1,4}") {
        let t = translator(V1, V2);
        let mapped = t.translate_compiler_spec(&CompilerSpecId::new(id.clone()));
        prop_assert!(t.new_language().compiler_spec(&mapped).is_some());
        if id == "abc" || id == "xyz" {
            prop_assert_eq!(mapped.as_str(), id.as_str());
        } else {
            prop_assert_eq!(mapped.as_str(), "abc");
        }
    }
}
