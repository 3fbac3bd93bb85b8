use contig_common::{Error, Result};

use crate::{DynamicArray, Element, Relocation};

/// Copy-relocated element without any failure injection.
#[derive(Debug, PartialEq)]
struct Boxed(Box<i32>);

impl Element for Boxed {
    const INFALLIBLE_MOVE: bool = false;
    const COPYABLE: bool = true;

    fn try_copy(&self) -> Result<Self> {
        Ok(Boxed(self.0.clone()))
    }
}

fn boxed(values: &[i32]) -> DynamicArray<Boxed> {
    let mut arr = DynamicArray::new();
    for &v in values {
        arr.push_back(Boxed(Box::new(v))).unwrap();
    }
    arr
}

fn unboxed(arr: &DynamicArray<Boxed>) -> Vec<i32> {
    arr.iter().map(|b| *b.0).collect()
}

#[test]
fn test_new_is_empty() {
    let arr = DynamicArray::<i32>::new();
    assert!(arr.is_empty());
    assert_eq!(arr.len(), 0);
    assert_eq!(arr.capacity(), 0);
    assert!(arr.as_slice().is_empty());
}

#[test]
fn test_with_size_default_constructs() {
    let arr = DynamicArray::<String>::with_size(4).unwrap();
    assert_eq!(arr.len(), 4);
    assert_eq!(arr.capacity(), 4);
    assert!(arr.iter().all(|s| s.is_empty()));

    let empty = DynamicArray::<String>::with_size(0).unwrap();
    assert_eq!(empty.capacity(), 0);
}

#[test]
fn test_push_sequence_and_capacity_doubling() {
    let mut arr = DynamicArray::new();
    let mut capacities = Vec::new();
    for v in 0..9 {
        arr.push_back(v).unwrap();
        capacities.push(arr.capacity());
    }
    assert_eq!(capacities, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
    assert_eq!(arr.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_push_back_returns_new_element() {
    let mut arr = DynamicArray::new();
    *arr.push_back(1).unwrap() += 10;
    *arr.push_back(2).unwrap() += 10;
    assert_eq!(arr.as_slice(), &[11, 12]);

    let s = arr.emplace_back(|| Ok(3)).unwrap();
    assert_eq!(*s, 3);
}

#[test]
fn test_reference_scenario() {
    let mut arr = DynamicArray::new();
    for v in 1..=5 {
        arr.push_back(v).unwrap();
    }
    assert_eq!(arr.len(), 5);
    assert_eq!(arr.capacity(), 8);
    assert_eq!(arr.as_slice(), &[1, 2, 3, 4, 5]);

    assert_eq!(arr.erase(2).unwrap(), 2);
    assert_eq!(arr.as_slice(), &[1, 2, 4, 5]);

    assert_eq!(arr.insert(0, 0).unwrap(), 0);
    assert_eq!(arr.as_slice(), &[0, 1, 2, 4, 5]);

    let mut source = DynamicArray::new();
    source.push_back(9).unwrap();
    source.push_back(9).unwrap();
    arr.assign_from(&source).unwrap();
    assert_eq!(arr.as_slice(), &[9, 9]);
    assert_eq!(arr.capacity(), 8);
}

#[test]
fn test_insert_at_begin_shifts_everything() {
    let mut arr = DynamicArray::new();
    arr.reserve(8).unwrap();
    for v in ["b", "c", "d"] {
        arr.push_back(v.to_string()).unwrap();
    }
    arr.insert(0, "a".to_string()).unwrap();
    assert_eq!(arr.as_slice(), &["a", "b", "c", "d"]);
    assert_eq!(arr.capacity(), 8);
}

#[test]
fn test_insert_at_end_appends() {
    let mut arr = DynamicArray::new();
    arr.push_back(1).unwrap();
    let pos = arr.insert(1, 2).unwrap();
    assert_eq!(pos, 1);
    assert_eq!(arr.as_slice(), &[1, 2]);
    assert_eq!(arr.capacity(), 2);
}

#[test]
fn test_insert_into_full_array_grows_around_position() {
    let mut arr = DynamicArray::new();
    for v in [1, 2, 4, 5] {
        arr.push_back(v).unwrap();
    }
    assert_eq!(arr.capacity(), 4);
    assert_eq!(arr.insert(2, 3).unwrap(), 2);
    assert_eq!(arr.as_slice(), &[1, 2, 3, 4, 5]);
    assert_eq!(arr.capacity(), 8);
}

#[test]
fn test_growth_places_new_element() {
    let mut arr = DynamicArray::new();
    arr.push_back(String::from("b")).unwrap();
    assert_eq!(arr.capacity(), 1);

    // Each call below finds the storage full.
    arr.emplace_back(|| Ok(String::from("c"))).unwrap();
    assert_eq!(arr.capacity(), 2);
    arr.emplace(0, || Ok(String::from("a"))).unwrap();
    assert_eq!(arr.capacity(), 4);
    assert_eq!(arr.as_slice(), &["a", "b", "c"]);
}

#[test]
fn test_emplace_into_empty_array() {
    let mut arr = DynamicArray::new();
    assert_eq!(arr.emplace(0, || Ok(42)).unwrap(), 0);
    assert_eq!(arr.as_slice(), &[42]);
    assert_eq!(arr.capacity(), 1);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_emplace_past_end_panics() {
    let mut arr = DynamicArray::new();
    arr.push_back(1).unwrap();
    let _ = arr.insert(2, 5);
}

#[test]
fn test_erase_only_element() {
    let mut arr = DynamicArray::new();
    arr.push_back("x".to_string()).unwrap();
    assert_eq!(arr.erase(0).unwrap(), 0);
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), 1);
}

#[test]
fn test_erase_last_matches_pop() {
    let mut a = DynamicArray::new();
    let mut b = DynamicArray::new();
    for v in 0..5 {
        a.push_back(v).unwrap();
        b.push_back(v).unwrap();
    }
    a.erase(4).unwrap();
    assert_eq!(b.pop_back(), Some(4));
    assert_eq!(a.as_slice(), b.as_slice());
    assert_eq!(a.capacity(), b.capacity());
}

#[test]
#[should_panic(expected = "out of range")]
fn test_erase_at_end_panics() {
    let mut arr = DynamicArray::new();
    arr.push_back(1).unwrap();
    let _ = arr.erase(1);
}

#[test]
fn test_pop_back_on_empty_returns_none() {
    let mut arr = DynamicArray::<u8>::new();
    assert_eq!(arr.pop_back(), None);
}

#[test]
fn test_copy_relocated_shifts() {
    let mut arr = boxed(&[1, 2, 3]);
    assert_eq!(arr.relocation(), Relocation::Copy);
    assert_eq!(arr.capacity(), 4);

    // In place: room for one more.
    arr.insert(1, Boxed(Box::new(10))).unwrap();
    assert_eq!(unboxed(&arr), [1, 10, 2, 3]);

    // Full: grows around the position.
    arr.insert(0, Boxed(Box::new(0))).unwrap();
    assert_eq!(unboxed(&arr), [0, 1, 10, 2, 3]);
    assert_eq!(arr.capacity(), 8);

    arr.erase(2).unwrap();
    assert_eq!(unboxed(&arr), [0, 1, 2, 3]);
    arr.erase(0).unwrap();
    assert_eq!(unboxed(&arr), [1, 2, 3]);
}

#[test]
fn test_try_clone_is_deep_and_independent() {
    let mut a = DynamicArray::new();
    for s in ["x", "y"] {
        a.push_back(s.to_string()).unwrap();
    }
    a.reserve(10).unwrap();

    let mut b = a.try_clone().unwrap();
    assert_eq!(b.as_slice(), a.as_slice());
    assert_eq!(b.capacity(), 2);

    b[0].push('!');
    b.push_back("z".to_string()).unwrap();
    assert_eq!(a.as_slice(), &["x", "y"]);
    assert_eq!(b.as_slice(), &["x!", "y", "z"]);
}

#[test]
fn test_clone_trait_matches_try_clone() {
    let mut a = DynamicArray::new();
    a.push_back(vec![1u8, 2]).unwrap();
    let b = a.clone();
    assert_eq!(a.as_slice(), b.as_slice());

    let mut c = DynamicArray::new();
    c.clone_from(&a);
    assert_eq!(c.as_slice(), a.as_slice());
}

#[test]
fn test_take_moves_storage_without_touching_elements() {
    let mut a = DynamicArray::new();
    for v in 0..3 {
        a.push_back(v.to_string()).unwrap();
    }
    let data = a.as_ptr();
    let first = a[0].as_ptr();

    let b = a.take();
    assert_eq!(a.len(), 0);
    assert_eq!(a.capacity(), 0);
    assert_eq!(b.len(), 3);
    assert_eq!(b.as_ptr(), data);
    assert_eq!(b[0].as_ptr(), first);
}

#[test]
fn test_assign_moved_replaces_contents() {
    let mut a = DynamicArray::new();
    a.push_back(1).unwrap();
    let mut b = DynamicArray::new();
    for v in [7, 8, 9] {
        b.push_back(v).unwrap();
    }
    let data = b.as_ptr();

    a.assign_moved(&mut b);
    assert_eq!(a.as_slice(), &[7, 8, 9]);
    assert_eq!(a.as_ptr(), data);
    assert!(b.is_empty());
    assert_eq!(b.capacity(), 0);
}

#[test]
fn test_assign_from_reallocates_when_capacity_is_short() {
    let mut dst = DynamicArray::new();
    dst.push_back(0).unwrap();
    let src = {
        let mut src = DynamicArray::new();
        for v in 1..=5 {
            src.push_back(v).unwrap();
        }
        src
    };
    dst.assign_from(&src).unwrap();
    assert_eq!(dst.as_slice(), src.as_slice());
    assert_eq!(dst.capacity(), 5);
}

#[test]
fn test_assign_from_reuses_storage_when_growing_within_capacity() {
    let mut dst = DynamicArray::new();
    dst.reserve(6).unwrap();
    dst.push_back("a".to_string()).unwrap();
    let data = dst.as_ptr();

    let mut src = DynamicArray::new();
    for s in ["p", "q", "r"] {
        src.push_back(s.to_string()).unwrap();
    }
    dst.assign_from(&src).unwrap();
    assert_eq!(dst.as_slice(), &["p", "q", "r"]);
    assert_eq!(dst.capacity(), 6);
    assert_eq!(dst.as_ptr(), data);
}

#[test]
fn test_reserve_is_noop_when_sufficient() {
    let mut arr = DynamicArray::new();
    arr.reserve(4).unwrap();
    arr.push_back(1).unwrap();
    let data = arr.as_ptr();
    arr.reserve(2).unwrap();
    arr.reserve(4).unwrap();
    assert_eq!(arr.capacity(), 4);
    assert_eq!(arr.as_ptr(), data);
}

#[test]
fn test_reserve_exact_and_preserves_contents() {
    let mut arr = boxed(&[1, 2, 3]);
    arr.reserve(11).unwrap();
    assert_eq!(arr.capacity(), 11);
    assert_eq!(unboxed(&arr), [1, 2, 3]);
}

#[test]
fn test_reserve_overflow_leaves_array_unchanged() {
    let mut arr = DynamicArray::new();
    arr.push_back(1u64).unwrap();
    let err = arr.reserve(usize::MAX).unwrap_err();
    assert!(err.is_allocation());
    assert_eq!(arr.as_slice(), &[1]);
    assert_eq!(arr.capacity(), 1);
}

#[test]
fn test_resize_grows_and_shrinks() {
    let mut arr = DynamicArray::new();
    arr.push_back(5).unwrap();
    arr.resize(4).unwrap();
    assert_eq!(arr.as_slice(), &[5, 0, 0, 0]);
    assert_eq!(arr.capacity(), 4);

    arr.resize(2).unwrap();
    assert_eq!(arr.as_slice(), &[5, 0]);
    assert_eq!(arr.capacity(), 4);

    arr.resize(2).unwrap();
    assert_eq!(arr.len(), 2);
}

#[test]
fn test_truncate_and_clear_keep_capacity() {
    let mut arr = DynamicArray::new();
    for v in 0..6 {
        arr.push_back(v.to_string()).unwrap();
    }
    arr.truncate(10);
    assert_eq!(arr.len(), 6);
    arr.truncate(3);
    assert_eq!(arr.as_slice(), &["0", "1", "2"]);
    arr.clear();
    assert!(arr.is_empty());
    assert_eq!(arr.capacity(), 8);
}

#[test]
fn test_swap_with() {
    let mut a = DynamicArray::new();
    a.push_back(1).unwrap();
    let mut b = DynamicArray::new();
    b.push_back(2).unwrap();
    b.push_back(3).unwrap();
    a.swap_with(&mut b);
    assert_eq!(a.as_slice(), &[2, 3]);
    assert_eq!(b.as_slice(), &[1]);
}

#[test]
fn test_failing_constructor_leaves_array_untouched() {
    let mut arr = DynamicArray::new();
    for v in 0..4 {
        arr.push_back(v).unwrap();
    }
    let data = arr.as_ptr();

    let err = arr
        .emplace_back(|| Err(Error::element("construct", "nope")))
        .unwrap_err();
    assert!(!err.is_allocation());
    assert_eq!(arr.as_slice(), &[0, 1, 2, 3]);
    assert_eq!(arr.capacity(), 4);
    assert_eq!(arr.as_ptr(), data);

    arr.emplace(1, || Err(Error::element("construct", "nope")))
        .unwrap_err();
    assert_eq!(arr.as_slice(), &[0, 1, 2, 3]);
    assert_eq!(arr.as_ptr(), data);
}

#[test]
fn test_zero_sized_elements() {
    let mut arr = DynamicArray::new();
    for _ in 0..100 {
        arr.push_back(()).unwrap();
    }
    assert_eq!(arr.len(), 100);
    assert_eq!(arr.capacity(), 128);
    arr.insert(50, ()).unwrap();
    arr.erase(0).unwrap();
    assert_eq!(arr.len(), 100);
}

#[test]
fn test_iteration() {
    let mut arr = DynamicArray::new();
    for v in 1..=3 {
        arr.push_back(v).unwrap();
    }
    for v in &mut arr {
        *v *= 2;
    }
    let collected: Vec<i32> = (&arr).into_iter().copied().collect();
    assert_eq!(collected, [2, 4, 6]);
    assert_eq!(arr.iter().sum::<i32>(), 12);
}

#[test]
fn test_debug_output() {
    let mut arr = DynamicArray::new();
    arr.push_back(1).unwrap();
    arr.push_back(2).unwrap();
    let s = format!("{arr:?}");
    assert!(s.contains("values: [1, 2]"));
    assert!(s.contains("cap: 2"));
}
