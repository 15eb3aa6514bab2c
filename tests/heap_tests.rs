// Allocator and scope-stack tests

use lingo::memory::heap::{Heap, HeapError};
use lingo::memory::scope::{ScopeKind, ScopeStack};
use lingo::memory::value::{Ownership, ScopeId, Value, VarType, Variable};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn temp() -> Ownership {
    Ownership::Temporary(ScopeId::GLOBAL)
}

#[test]
fn test_allocations_do_not_overlap() {
    let mut heap = Heap::new(64);
    let a = heap.allocate(8, temp()).unwrap();
    let b = heap.allocate(8, temp()).unwrap();
    let c = heap.allocate(1, temp()).unwrap();

    assert_eq!(a.address(), 56);
    assert_eq!(b.address(), 48);
    assert_eq!(c.address(), 47);
    assert_eq!(heap.occupied(), 17);
    assert_eq!(heap.live_count(), 3);
}

#[test]
fn test_free_clears_and_allows_reuse() {
    let mut heap = Heap::new(32);
    let ptr = heap.allocate(8, temp()).unwrap();
    heap.write_value(ptr, Value::Number(42.5)).unwrap();

    heap.free(ptr).unwrap();

    assert_eq!(heap.occupied(), 0);
    assert_eq!(heap.live_count(), 0);
    assert!(heap.bytes().iter().all(|b| *b == 0));
    assert!(heap.reserved_map().iter().all(|r| !r));

    let reused = heap.allocate(8, temp()).unwrap();
    assert_eq!(reused.address(), ptr.address());
    assert_ne!(reused.generation(), ptr.generation());
}

#[test]
fn test_stale_handle_is_rejected() {
    let mut heap = Heap::new(32);
    let ptr = heap.allocate(8, temp()).unwrap();
    heap.free(ptr).unwrap();
    let _reused = heap.allocate(8, temp()).unwrap();

    assert_eq!(
        heap.read_value(ptr, VarType::Number),
        Err(HeapError::InvalidPointer { pointer: ptr })
    );
    assert_eq!(heap.free(ptr), Err(HeapError::InvalidPointer { pointer: ptr }));
}

#[test]
fn test_double_free_is_rejected() {
    let mut heap = Heap::new(16);
    let ptr = heap.allocate(1, temp()).unwrap();
    heap.free(ptr).unwrap();

    assert!(matches!(heap.free(ptr), Err(HeapError::InvalidPointer { .. })));
}

#[test]
fn test_out_of_memory_reports_request() {
    let mut heap = Heap::new(12);
    heap.allocate(8, temp()).unwrap();

    let err = heap.allocate(8, temp()).unwrap_err();
    assert_eq!(
        err,
        HeapError::OutOfMemory {
            requested: 8,
            capacity: 12,
            occupied: 8,
        }
    );
}

#[test]
fn test_fragmentation_is_not_compacted() {
    let mut heap = Heap::new(24);
    let a = heap.allocate(8, temp()).unwrap();
    let _b = heap.allocate(8, temp()).unwrap();
    let c = heap.allocate(8, temp()).unwrap();
    heap.free(a).unwrap();
    heap.free(c).unwrap();

    // 16 bytes free, but not contiguous
    assert!(matches!(
        heap.allocate(16, temp()),
        Err(HeapError::OutOfMemory { requested: 16, .. })
    ));
}

#[test]
fn test_number_round_trip() {
    let mut heap = Heap::new(16);
    let ptr = heap.allocate(8, temp()).unwrap();
    heap.write_value(ptr, Value::Number(-0.125)).unwrap();

    assert_eq!(heap.read_bytes(ptr).unwrap(), &(-0.125f64).to_le_bytes());
    assert_eq!(heap.read_value(ptr, VarType::Number).unwrap(), Value::Number(-0.125));
}

#[test]
fn test_sweep_keeps_owned_pointers() {
    let mut heap = Heap::new(64);
    let owned = heap.allocate(8, Ownership::Owned(ScopeId::GLOBAL)).unwrap();
    heap.allocate(8, temp()).unwrap();
    heap.allocate(1, Ownership::Temporary(ScopeId(3))).unwrap();

    assert_eq!(heap.sweep_temporaries(), 2);
    assert_eq!(heap.live_count(), 1);
    assert!(heap.validate(owned).is_ok());
}

#[test]
fn test_sweep_from_floor_spares_older_scopes() {
    let mut heap = Heap::new(64);
    let pending = heap.allocate(8, Ownership::Temporary(ScopeId(1))).unwrap();
    heap.allocate(8, Ownership::Temporary(ScopeId(2))).unwrap();
    heap.allocate(8, Ownership::Temporary(ScopeId(4))).unwrap();

    assert_eq!(heap.sweep_temporaries_from(ScopeId(2)), 2);
    assert!(heap.validate(pending).is_ok());
}

#[test]
fn test_adopt_and_release_change_ownership_only() {
    let mut heap = Heap::new(16);
    let ptr = heap.allocate(8, temp()).unwrap();
    heap.write_value(ptr, Value::Number(7.0)).unwrap();

    heap.adopt(ptr, ScopeId(2)).unwrap();
    assert_eq!(heap.ownership(ptr).unwrap(), Ownership::Owned(ScopeId(2)));
    assert_eq!(heap.sweep_temporaries(), 0);

    heap.release(ptr, ScopeId(1)).unwrap();
    assert_eq!(heap.ownership(ptr).unwrap(), Ownership::Temporary(ScopeId(1)));
    assert_eq!(heap.read_value(ptr, VarType::Number).unwrap(), Value::Number(7.0));
}

#[test]
fn test_copy_requires_equal_sizes() {
    let mut heap = Heap::new(32);
    let number = heap.allocate(8, temp()).unwrap();
    let flag = heap.allocate(1, temp()).unwrap();
    let other = heap.allocate(8, temp()).unwrap();
    heap.write_value(number, Value::Number(3.0)).unwrap();

    assert!(matches!(heap.copy(number, flag), Err(HeapError::Overrun { .. })));

    heap.copy(number, other).unwrap();
    assert_eq!(heap.read_value(other, VarType::Number).unwrap(), Value::Number(3.0));
}

#[test]
fn test_pop_frees_only_owned_by_popped_scope() {
    let mut heap = Heap::new(64);
    let mut scopes = ScopeStack::new();
    let global = scopes.push(ScopeKind::Global, "global");

    let outer = heap.allocate(8, Ownership::Owned(global)).unwrap();
    heap.write_value(outer, Value::Number(1.0)).unwrap();
    scopes.bind_variable("x", Variable::new(outer, VarType::Number));

    let block = scopes.push(ScopeKind::Block, "block");
    let inner = heap.allocate(8, Ownership::Owned(block)).unwrap();
    let leftover = heap.allocate(1, Ownership::Temporary(block)).unwrap();
    scopes.bind_variable("y", Variable::new(inner, VarType::Number));

    let popped = scopes.pop(&mut heap).unwrap();
    assert_eq!(popped.id(), block);
    assert!(heap.validate(inner).is_err());
    assert!(heap.validate(leftover).is_err());
    assert_eq!(heap.read_value(outer, VarType::Number).unwrap(), Value::Number(1.0));
    assert_eq!(heap.live_count(), 1);
}

#[test]
fn test_child_scope_sees_and_shadows_parent() {
    let mut heap = Heap::new(64);
    let mut scopes = ScopeStack::new();
    let global = scopes.push(ScopeKind::Global, "global");
    let outer = heap.allocate(8, Ownership::Owned(global)).unwrap();
    scopes.bind_variable("x", Variable::new(outer, VarType::Number));

    let block = scopes.push(ScopeKind::Block, "block");
    assert_eq!(scopes.lookup_variable("x").map(|v| v.pointer), Some(outer));

    let inner = heap.allocate(1, Ownership::Owned(block)).unwrap();
    scopes.bind_variable("x", Variable::new(inner, VarType::Boolean));
    assert_eq!(scopes.lookup_variable("x").map(|v| v.pointer), Some(inner));
    assert_eq!(scopes.peek(1).and_then(|ctx| ctx.get_var("x")).map(|v| v.pointer), Some(outer));

    scopes.pop(&mut heap);
    assert_eq!(scopes.lookup_variable("x").map(|v| v.pointer), Some(outer));
}

#[test]
fn test_scope_ids_increase_and_trace_is_innermost_first() {
    let mut scopes = ScopeStack::new();
    let global = scopes.push(ScopeKind::Global, "global");
    let f = scopes.push(ScopeKind::Function, "f");
    let block = scopes.push(ScopeKind::Block, "block");

    assert!(global < f && f < block);
    assert_eq!(scopes.caller_id(), Some(global));
    assert_eq!(scopes.sweep_floor(), f);
    assert_eq!(scopes.call_depth(), 1);

    let names: Vec<String> = scopes.trace().into_iter().map(|frame| frame.name).collect();
    assert_eq!(names, vec!["block", "f", "global"]);
}

proptest! {
    #[test]
    fn prop_live_ranges_are_disjoint_and_in_bounds(sizes in prop::collection::vec(1usize..=16, 1..40)) {
        let mut heap = Heap::new(256);
        let mut live = Vec::new();
        for size in sizes {
            match heap.allocate(size, temp()) {
                Ok(ptr) => live.push(ptr),
                Err(HeapError::OutOfMemory { requested, .. }) => prop_assert_eq!(requested, size),
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }

        let mut covered = vec![false; heap.capacity()];
        for ptr in &live {
            prop_assert!(ptr.address() + ptr.size() <= heap.capacity());
            for i in ptr.range() {
                prop_assert!(!covered[i]);
                prop_assert!(heap.reserved_map()[i]);
                covered[i] = true;
            }
        }
        prop_assert_eq!(heap.occupied(), live.iter().map(|p| p.size()).sum::<usize>());

        prop_assert_eq!(heap.sweep_temporaries(), live.len());
        prop_assert_eq!(heap.occupied(), 0);
        prop_assert!(heap.bytes().iter().all(|b| *b == 0));
    }
}
