//! Memory model for the evaluator
//!
//! This module provides the core memory abstractions:
//! - [`value`]: Handles and scalars ([`value::Pointer`], [`value::Variable`], [`value::Value`])
//! - [`heap`]: Fixed-capacity byte heap with a reservation map and pointer registry
//! - [`scope`]: Scope-context stack that ties binding lifetime to lexical lifetime
//!
//! # Encoding
//!
//! Every runtime scalar lives in heap bytes:
//! - `number`: 8 bytes, little-endian IEEE-754 bits
//! - `boolean`: 1 flag byte (0 or 1) stored in the *final* byte of its range
//!
//! [`encode`] and [`decode`] convert between [`value::Value`] and those bytes.

pub mod heap;
pub mod scope;
pub mod value;

use value::{Value, VarType};

/// Encode a value into exactly `size` bytes.
///
/// Returns `None` when `size` is too small to hold the value.
pub fn encode(value: Value, size: usize) -> Option<Vec<u8>> {
    if size < value.var_type().size() {
        return None;
    }

    let mut bytes = vec![0u8; size];
    match value {
        Value::Number(n) => {
            bytes[..8].copy_from_slice(&n.to_bits().to_le_bytes());
        }
        Value::Boolean(b) => {
            bytes[size - 1] = u8::from(b);
        }
    }
    Some(bytes)
}

/// Decode a value of type `var_type` from a byte range.
///
/// Returns `None` when the range is shorter than the type's size.
pub fn decode(bytes: &[u8], var_type: VarType) -> Option<Value> {
    if bytes.len() < var_type.size() {
        return None;
    }

    match var_type {
        VarType::Number => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[..8]);
            Some(Value::Number(f64::from_bits(u64::from_le_bytes(raw))))
        }
        VarType::Boolean => bytes.last().map(|&flag| Value::Boolean(flag == 1)),
    }
}
