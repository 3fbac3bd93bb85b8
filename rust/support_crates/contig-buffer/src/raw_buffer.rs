//! Owned raw storage for a fixed number of element slots.
//!
//! `RawBuffer` separates "reserve space" from "bring an element to life": it
//! only allocates and frees memory, and hands out raw pointers into the region.
//! Whoever owns the buffer decides which slots hold live values and is
//! responsible for constructing and destroying them.
//!
//! # Safety
//!
//! The buffer never reads, drops or otherwise interprets its contents. Dropping
//! or releasing a buffer whose slots still hold live values leaks those values
//! (their destructors do not run), but is never unsound.

use std::alloc::{self, Layout};
use std::mem;
use std::ptr::NonNull;

use contig_common::{Error, Result};

/// An owned, contiguous region of uninitialized memory with room for
/// `capacity` values of `T`.
///
/// A buffer can be moved, swapped and taken, but never copied: duplicating the
/// bytes without knowing which slots are live is meaningless.
///
/// ```compile_fail
/// use contig_buffer::RawBuffer;
///
/// let a = RawBuffer::<u32>::request(4).unwrap();
/// let b = a.clone();
/// ```
pub struct RawBuffer<T> {
    /// Start of the region. Dangling when nothing is allocated.
    ptr: NonNull<T>,
    /// Number of element slots reserved (not necessarily constructed).
    capacity: usize,
}

impl<T> RawBuffer<T> {
    /// Creates an empty buffer with zero capacity and no allocation.
    #[inline]
    pub const fn new() -> RawBuffer<T> {
        RawBuffer {
            ptr: NonNull::dangling(),
            capacity: 0,
        }
    }

    /// Acquires raw space for `capacity` elements.
    ///
    /// A zero `capacity` produces an empty buffer without touching the
    /// allocator, as does any request for a zero-sized `T`.
    ///
    /// # Errors
    ///
    /// - `CapacityOverflow` if `capacity` elements of `T` exceed the largest
    ///   allocation the platform can describe.
    /// - `AllocationFailed` if the global allocator cannot satisfy the request.
    ///
    /// On error nothing has been allocated.
    pub fn request(capacity: usize) -> Result<RawBuffer<T>> {
        if capacity == 0 {
            return Ok(RawBuffer::new());
        }
        if mem::size_of::<T>() == 0 {
            return Ok(RawBuffer {
                ptr: NonNull::dangling(),
                capacity,
            });
        }

        let layout = Layout::array::<T>(capacity)
            .map_err(|_| Error::capacity_overflow(capacity, mem::size_of::<T>()))?;
        // SAFETY: `layout` has a non-zero size: both `capacity` and the element
        // size are non-zero here.
        let ptr = unsafe { alloc::alloc(layout) } as *mut T;
        let Some(ptr) = NonNull::new(ptr) else {
            log::debug!(
                "raw buffer request failed: capacity={capacity}, bytes={}",
                layout.size()
            );
            return Err(Error::allocation_failed(layout.size(), layout.align()));
        };
        log::trace!(
            "raw buffer acquired: capacity={capacity}, bytes={}",
            layout.size()
        );
        Ok(RawBuffer { ptr, capacity })
    }

    /// Frees the raw space and leaves the buffer empty.
    ///
    /// Calling this on an empty (or already released) buffer is a no-op.
    /// Values still constructed in the region are not dropped.
    pub fn release(&mut self) {
        if self.is_allocated() {
            let bytes = self.byte_size();
            // SAFETY: the region was allocated by `request` with exactly this
            // layout, which was validated at that point.
            unsafe {
                let layout = Layout::from_size_align_unchecked(bytes, mem::align_of::<T>());
                alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout);
            }
            log::trace!(
                "raw buffer released: capacity={}, bytes={bytes}",
                self.capacity
            );
        }
        self.ptr = NonNull::dangling();
        self.capacity = 0;
    }

    /// Transfers ownership of the region out of `self`, leaving `self` empty.
    #[inline]
    pub fn take(&mut self) -> RawBuffer<T> {
        mem::take(self)
    }

    /// Exchanges regions (address and capacity) with `other`.
    ///
    /// This is the commit step after a replacement buffer has been fully
    /// populated; it cannot fail.
    #[inline]
    pub fn swap(&mut self, other: &mut RawBuffer<T>) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Returns the number of element slots reserved by this buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of bytes owned by this buffer.
    #[inline]
    pub fn byte_size(&self) -> usize {
        // Cannot overflow: the same product was validated by `request`.
        self.capacity * mem::size_of::<T>()
    }

    /// Returns the start of the region, or `None` when the capacity is zero.
    #[inline]
    pub fn address(&self) -> Option<NonNull<T>> {
        if self.capacity == 0 {
            None
        } else {
            Some(self.ptr)
        }
    }

    /// Returns a raw pointer to the start of the region.
    ///
    /// For an empty buffer the pointer is dangling but well aligned, which makes
    /// it suitable for zero-length slices.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns a mutable raw pointer to the start of the region.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns a raw pointer `offset` slots past the start of the region.
    ///
    /// `offset == capacity` (one past the end) is allowed. Larger offsets are a
    /// programming error, checked in debug builds only.
    #[inline]
    pub fn offset(&self, offset: usize) -> *mut T {
        debug_assert!(
            offset <= self.capacity,
            "offset {offset} out of range for capacity {}",
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(offset)
    }

    /// Returns a raw pointer to the slot at `index`.
    ///
    /// `index` must be below the capacity; this is checked in debug builds only.
    /// The slot may or may not hold a live value.
    #[inline]
    pub fn slot(&self, index: usize) -> *mut T {
        debug_assert!(
            index < self.capacity,
            "slot {index} out of range for capacity {}",
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(index)
    }

    /// Views the first `len` slots as a slice.
    ///
    /// # Safety
    ///
    /// `len` must not exceed the capacity and every slot in `[0, len)` must hold
    /// a live value for the lifetime of the returned slice.
    #[inline]
    pub unsafe fn prefix(&self, len: usize) -> &[T] {
        debug_assert!(len <= self.capacity);
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), len) }
    }

    /// Views the first `len` slots as a mutable slice.
    ///
    /// # Safety
    ///
    /// Same requirements as [`RawBuffer::prefix`].
    #[inline]
    pub unsafe fn prefix_mut(&mut self, len: usize) -> &mut [T] {
        debug_assert!(len <= self.capacity);
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), len) }
    }

    #[inline]
    fn is_allocated(&self) -> bool {
        self.capacity != 0 && mem::size_of::<T>() != 0
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        RawBuffer::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}

// SAFETY: the buffer exclusively owns its region; handing it to another thread
// is as safe as handing over the values the owner keeps in it.
unsafe impl<T: Send> Send for RawBuffer<T> {}

// SAFETY: shared access only yields raw pointers and, through `prefix`, shared
// slices of `T`.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> std::fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawBuffer")
            .field("ptr", &self.address())
            .field("capacity", &self.capacity)
            .field("bytes", &self.byte_size())
            .finish()
    }
}
