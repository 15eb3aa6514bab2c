//! Heap implementation for the evaluator
//!
//! This module provides the simulated byte-addressable heap:
//! - A fixed-capacity byte buffer, the sole backing store for runtime scalars
//! - A reservation map with one flag per byte (distinguishes "free" from "zero")
//! - A pointer registry keyed by address, carrying each range's generation and
//!   [`Ownership`]
//!
//! # Allocation
//!
//! [`Heap::allocate`] scans from the highest address downward for the first run of
//! bytes that are both unreserved and zero-valued. There is no compaction: once the
//! free space is too fragmented for a request, allocation fails with
//! [`HeapError::OutOfMemory`].
//!
//! # Reclamation
//!
//! Ranges are reclaimed three ways: an explicit [`Heap::free`], the temporary sweep
//! ([`Heap::sweep_temporaries`]), and scope pop ([`Heap::free_owned_by`]). Freeing
//! always clears the reservation flags and zeroes the bytes.

use super::value::{Address, Ownership, Pointer, ScopeId, Value, VarType};
use super::{decode, encode};
use crate::interpreter::constants::DEFAULT_HEAP_SIZE;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::trace;

/// Faults raised by the allocator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    /// No contiguous free run of the requested size exists
    #[error(
        "out of memory: no free run of {requested} bytes in a {capacity}-byte heap ({occupied} bytes occupied)"
    )]
    OutOfMemory {
        requested: usize,
        capacity: usize,
        occupied: usize,
    },

    /// The handle is not registered, or is registered under another generation
    #[error("invalid pointer {pointer}")]
    InvalidPointer { pointer: Pointer },

    /// The range is too small for the value being written or read
    #[error("pointer {pointer} cannot hold a {needed}-byte value")]
    Overrun { pointer: Pointer, needed: usize },
}

/// A registered heap range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub pointer: Pointer,
    pub ownership: Ownership,
}

/// The heap
#[derive(Debug, Clone)]
pub struct Heap {
    bytes: Vec<u8>,
    reserved: Vec<bool>,
    registry: FxHashMap<Address, Allocation>,
    next_generation: u32,
}

impl Heap {
    /// Create a zeroed heap of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Heap {
            bytes: vec![0; capacity],
            reserved: vec![false; capacity],
            registry: FxHashMap::default(),
            next_generation: 1,
        }
    }

    /// Reserve `size` bytes and register a pointer with the given ownership
    pub fn allocate(&mut self, size: usize, ownership: Ownership) -> Result<Pointer, HeapError> {
        if size > 0 {
            let mut run = 0;
            for i in (0..self.bytes.len()).rev() {
                if self.bytes[i] == 0 && !self.reserved[i] {
                    run += 1;
                } else {
                    run = 0;
                }

                if run == size {
                    for flag in &mut self.reserved[i..i + size] {
                        *flag = true;
                    }
                    let pointer = Pointer::new(i, size, self.next_generation);
                    self.next_generation = self.next_generation.wrapping_add(1);
                    self.registry.insert(i, Allocation { pointer, ownership });
                    trace!(%pointer, ?ownership, "allocate");
                    return Ok(pointer);
                }
            }
        }

        Err(HeapError::OutOfMemory {
            requested: size,
            capacity: self.capacity(),
            occupied: self.occupied(),
        })
    }

    /// Unregister a pointer, clear its reservation flags and zero its bytes
    pub fn free(&mut self, pointer: Pointer) -> Result<(), HeapError> {
        self.validate(pointer)?;
        self.release_range(pointer);
        Ok(())
    }

    /// Free every temporary, regardless of owning scope.
    ///
    /// Returns the number of pointers freed.
    pub fn sweep_temporaries(&mut self) -> usize {
        self.free_where(|ownership| ownership.is_temporary())
    }

    /// Free every temporary owned by `floor` or any scope pushed after it.
    ///
    /// Temporaries owned by older scopes (a caller's half-evaluated operands) are
    /// left alone.
    pub fn sweep_temporaries_from(&mut self, floor: ScopeId) -> usize {
        self.free_where(|ownership| {
            matches!(ownership, Ownership::Temporary(scope) if *scope >= floor)
        })
    }

    /// Free every pointer, temporary or owned, whose owning scope is `scope`
    pub fn free_owned_by(&mut self, scope: ScopeId) -> usize {
        self.free_where(|ownership| ownership.scope() == scope)
    }

    /// Check that a handle still names a live allocation
    pub fn validate(&self, pointer: Pointer) -> Result<(), HeapError> {
        let live = self.registry.get(&pointer.address()).is_some_and(|entry| {
            entry.pointer == pointer && self.reserved.get(pointer.address()) == Some(&true)
        });

        if live {
            Ok(())
        } else {
            Err(HeapError::InvalidPointer { pointer })
        }
    }

    /// Current ownership of a live pointer
    pub fn ownership(&self, pointer: Pointer) -> Result<Ownership, HeapError> {
        self.validate(pointer)?;
        self.registry
            .get(&pointer.address())
            .map(|entry| entry.ownership)
            .ok_or(HeapError::InvalidPointer { pointer })
    }

    /// Replace the ownership of a live pointer
    pub fn set_ownership(&mut self, pointer: Pointer, ownership: Ownership) -> Result<(), HeapError> {
        self.validate(pointer)?;
        let entry = self
            .registry
            .get_mut(&pointer.address())
            .ok_or(HeapError::InvalidPointer { pointer })?;
        entry.ownership = ownership;
        Ok(())
    }

    /// Mark a pointer as owned by a binding in `scope`
    pub fn adopt(&mut self, pointer: Pointer, scope: ScopeId) -> Result<(), HeapError> {
        self.set_ownership(pointer, Ownership::Owned(scope))
    }

    /// Hand a pointer to `scope` as a temporary
    pub fn release(&mut self, pointer: Pointer, scope: ScopeId) -> Result<(), HeapError> {
        self.set_ownership(pointer, Ownership::Temporary(scope))
    }

    /// Read the raw bytes behind a live pointer
    pub fn read_bytes(&self, pointer: Pointer) -> Result<&[u8], HeapError> {
        self.validate(pointer)?;
        Ok(&self.bytes[pointer.range()])
    }

    /// Encode `value` into the range behind `pointer`
    pub fn write_value(&mut self, pointer: Pointer, value: Value) -> Result<(), HeapError> {
        self.validate(pointer)?;
        let encoded = encode(value, pointer.size()).ok_or(HeapError::Overrun {
            pointer,
            needed: value.var_type().size(),
        })?;
        self.bytes[pointer.range()].copy_from_slice(&encoded);
        Ok(())
    }

    /// Decode a value of `var_type` from the range behind `pointer`
    pub fn read_value(&self, pointer: Pointer, var_type: VarType) -> Result<Value, HeapError> {
        let bytes = self.read_bytes(pointer)?;
        decode(bytes, var_type).ok_or(HeapError::Overrun {
            pointer,
            needed: var_type.size(),
        })
    }

    /// Copy the bytes of `src` over `dst` (both must be live and the same size)
    pub fn copy(&mut self, src: Pointer, dst: Pointer) -> Result<(), HeapError> {
        self.validate(src)?;
        self.validate(dst)?;
        if src.size() != dst.size() {
            return Err(HeapError::Overrun {
                pointer: dst,
                needed: src.size(),
            });
        }
        self.bytes.copy_within(src.range(), dst.address());
        Ok(())
    }

    /// Get the heap capacity in bytes
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Number of currently reserved bytes
    pub fn occupied(&self) -> usize {
        self.reserved.iter().filter(|&&flag| flag).count()
    }

    /// Number of registered pointers
    pub fn live_count(&self) -> usize {
        self.registry.len()
    }

    /// All live allocations, ordered by address
    pub fn allocations(&self) -> Vec<Allocation> {
        let mut allocations: Vec<Allocation> = self.registry.values().copied().collect();
        allocations.sort_by_key(|entry| entry.pointer.address());
        allocations
    }

    /// Look up the allocation that starts at `address`
    pub fn allocation_at(&self, address: Address) -> Option<&Allocation> {
        self.registry.get(&address)
    }

    /// The per-byte reservation flags
    pub fn reserved_map(&self) -> &[bool] {
        &self.reserved
    }

    /// The raw heap bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn free_where(&mut self, predicate: impl Fn(&Ownership) -> bool) -> usize {
        let doomed: Vec<Pointer> = self
            .registry
            .values()
            .filter(|entry| predicate(&entry.ownership))
            .map(|entry| entry.pointer)
            .collect();

        for pointer in &doomed {
            self.release_range(*pointer);
        }
        doomed.len()
    }

    fn release_range(&mut self, pointer: Pointer) {
        self.registry.remove(&pointer.address());
        for i in pointer.range() {
            self.reserved[i] = false;
            self.bytes[i] = 0;
        }
        trace!(%pointer, "free");
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(DEFAULT_HEAP_SIZE)
    }
}
