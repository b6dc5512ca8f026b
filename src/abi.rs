//! # ABI Serializer
//!
//! Serializes a module's [`crate::codegen::module_generator::MethodAbi`] list
//! into the `CompiledModule::abi` byte table: a length-prefixed method
//! table, in the declaration-then-trigger order `module_generator` already
//! assembles its methods in.
//!
//! Layout: a `u32` method count, followed by one entry per method:
//! - `u32` name length, then the UTF-8 name bytes
//! - `u8` paramCount
//! - `u8` flags: bit 0 = trigger, bit 1 = variadic, bit 2 = has a return value
//!   (bit 2's placement for `has_return` is this crate's own choice — see
//!   DESIGN.md, Open Question iii).

use crate::codegen::module_generator::MethodAbi;

const FLAG_TRIGGER: u8 = 0b001;
const FLAG_VARIADIC: u8 = 0b010;
const FLAG_HAS_RETURN: u8 = 0b100;

pub fn serialize(methods: &[MethodAbi]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(methods.len() as u32).to_le_bytes());
    for method in methods {
        let name_bytes = method.name.as_bytes();
        out.extend_from_slice(&(name_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(name_bytes);
        out.push(method.param_count);

        let mut flags = 0u8;
        if method.is_trigger {
            flags |= FLAG_TRIGGER;
        }
        if method.variadic {
            flags |= FLAG_VARIADIC;
        }
        if method.has_return {
            flags |= FLAG_HAS_RETURN;
        }
        out.push(flags);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, params: u8, has_return: bool, variadic: bool, is_trigger: bool) -> MethodAbi {
        MethodAbi { name: name.to_string(), param_count: params, has_return, variadic, is_trigger }
    }

    #[test]
    fn empty_table_is_just_a_count() {
        let bytes = serialize(&[]);
        assert_eq!(bytes, vec![0, 0, 0, 0]);
    }

    #[test]
    fn encodes_name_params_and_flags() {
        let bytes = serialize(&[method("transfer", 2, false, false, false)]);
        assert_eq!(&bytes[0..4], &1u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &8u32.to_le_bytes());
        assert_eq!(&bytes[8..16], b"transfer");
        assert_eq!(bytes[16], 2);
        assert_eq!(bytes[17], 0);
    }

    #[test]
    fn trigger_and_variadic_flags_set_expected_bits() {
        let bytes = serialize(&[method("onMint", 1, true, true, true)]);
        let flags = *bytes.last().unwrap();
        assert_eq!(flags, FLAG_TRIGGER | FLAG_VARIADIC | FLAG_HAS_RETURN);
    }
}
