//! Runtime value representation
//!
//! This module defines the handle and value types shared by the heap, the scope
//! stack and the evaluator:
//!
//! - [`Pointer`]: opaque handle to a reserved heap range (address, size, generation)
//! - [`Ownership`]: temporary or owned state of a reserved range, tracked by the heap
//! - [`Variable`]: a pointer paired with its runtime type tag
//! - [`Value`]: a decoded scalar read back out of the heap
//!
//! # Generations
//!
//! Every allocation receives a fresh generation number. A handle is only accepted
//! by the heap while the registry entry at its address carries the same generation,
//! so a handle kept across a `free` and a later reuse of the same bytes is rejected
//! instead of silently reading someone else's storage.

use crate::interpreter::constants::{BOOLEAN_SIZE, NUMBER_SIZE};
use std::fmt;
use std::ops::Range;

/// Heap address (byte offset into the heap buffer)
pub type Address = usize;

/// Identifier of a scope context.
///
/// Ids are handed out in increasing order, so a scope pushed later always has a
/// larger id than every scope beneath it on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    /// Id of the first scope pushed by an interpreter
    pub const GLOBAL: ScopeId = ScopeId(0);
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a reserved heap range `[address, address + size)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pointer {
    address: Address,
    size: usize,
    generation: u32,
}

impl Pointer {
    pub(crate) fn new(address: Address, size: usize, generation: u32) -> Self {
        Pointer {
            address,
            size,
            generation,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Byte range covered by this pointer
    pub fn range(&self) -> Range<usize> {
        self.address..self.address + self.size
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:04x}[{}]@g{}",
            self.address, self.size, self.generation
        )
    }
}

/// Lifetime state of a reserved range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Intermediate value; reclaimed by the temporary sweep or when its scope pops
    Temporary(ScopeId),
    /// Adopted by a binding; reclaimed only when its scope pops
    Owned(ScopeId),
}

impl Ownership {
    /// The scope whose pop reclaims this range
    pub fn scope(&self) -> ScopeId {
        match self {
            Ownership::Temporary(id) | Ownership::Owned(id) => *id,
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Ownership::Temporary(_))
    }
}

/// Runtime type tag of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Number,
    Boolean,
}

impl VarType {
    /// Storage size in bytes
    pub fn size(&self) -> usize {
        match self {
            VarType::Number => NUMBER_SIZE,
            VarType::Boolean => BOOLEAN_SIZE,
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarType::Number => write!(f, "number"),
            VarType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Scalar decoded from heap bytes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
}

impl Value {
    pub fn var_type(&self) -> VarType {
        match self {
            Value::Number(_) => VarType::Number,
            Value::Boolean(_) => VarType::Boolean,
        }
    }

    /// Get the number, returns None if this is a boolean
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Boolean(_) => None,
        }
    }

    /// Get the boolean, returns None if this is a number
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Number(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// A typed view of a heap range. Ownership lives on the pointer, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    pub pointer: Pointer,
    pub var_type: VarType,
}

impl Variable {
    pub fn new(pointer: Pointer, var_type: VarType) -> Self {
        Variable { pointer, var_type }
    }
}
