//! Scope guards that roll back partially constructed runs of slots.
//!
//! A guard owns a contiguous run of live values in raw storage and drops them
//! if it goes out of scope armed, which happens when an element operation
//! returns an error (or panics) before the run is handed over to its owner.
//! Success paths call [`InitGuard::disarm`].

use std::{mem, ptr};

use contig_common::Result;

use crate::element::Element;

pub(crate) struct InitGuard<T> {
    start: *mut T,
    len: usize,
}

impl<T> InitGuard<T> {
    /// Starts an empty run at `start`.
    ///
    /// # Safety
    ///
    /// Every slot later pushed through the guard must be valid for writes and
    /// must outlive the guard.
    #[inline]
    pub(crate) unsafe fn new(start: *mut T) -> InitGuard<T> {
        InitGuard { start, len: 0 }
    }

    /// Takes ownership of `len` live values starting at `start`.
    ///
    /// # Safety
    ///
    /// The slots must hold live values that nothing else will drop, and must
    /// outlive the guard.
    #[inline]
    pub(crate) unsafe fn occupied(start: *mut T, len: usize) -> InitGuard<T> {
        InitGuard { start, len }
    }

    /// Constructs `value` in the next slot of the run.
    ///
    /// # Safety
    ///
    /// The next slot must be raw (not holding a live value) and in bounds.
    #[inline]
    pub(crate) unsafe fn push(&mut self, value: T) {
        unsafe { self.start.add(self.len).write(value) };
        self.len += 1;
    }

    /// Hands the run over to its owner; nothing is dropped.
    #[inline]
    pub(crate) fn disarm(self) -> usize {
        let len = self.len;
        mem::forget(self);
        len
    }
}

impl<T> Drop for InitGuard<T> {
    fn drop(&mut self) {
        if self.len != 0 {
            log::debug!("rolling back {} constructed elements", self.len);
        }
        // SAFETY: the run holds exactly `len` live values owned by this guard.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.start, self.len)) };
    }
}

/// Copy-constructs every value of `source` into the raw slots starting at `dst`.
///
/// On success the copies are returned under an armed guard, so the caller can
/// still roll them back if a later step fails. On failure every copy made so
/// far has already been dropped; `source` is never modified.
///
/// # Safety
///
/// `dst` must be valid for writes of `source.len()` values, must not overlap
/// `source`, and must not hold live values.
pub(crate) unsafe fn copy_into<T: Element>(source: &[T], dst: *mut T) -> Result<InitGuard<T>> {
    // SAFETY: the caller guarantees `source.len()` raw, writable slots at `dst`.
    let mut built = unsafe { InitGuard::new(dst) };
    for value in source {
        let copy = value.try_copy()?;
        // SAFETY: fewer than `source.len()` slots have been written so far.
        unsafe { built.push(copy) };
    }
    Ok(built)
}
