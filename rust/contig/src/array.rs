//! The growable contiguous sequence.
//!
//! [`DynamicArray`] owns one [`RawBuffer`] plus a live-element count. Slots
//! `[0, len)` hold live values, slots `[len, capacity)` are raw. Every
//! structural operation combines raw storage acquisition with explicit
//! construction and destruction of individual slots.
//!
//! # Failure guarantees
//!
//! Element operations report failure through [`Result`]. Depending on the
//! operation, a failure leaves the array either exactly as it was (*strong*) or
//! in some valid state where every slot in `[0, len)` is live and nothing has
//! leaked (*basic*):
//!
//! | operation | guarantee |
//! |---|---|
//! | [`with_size`](DynamicArray::with_size), [`try_clone`](DynamicArray::try_clone), [`reserve`](DynamicArray::reserve) | strong |
//! | [`push_back`](DynamicArray::push_back), [`emplace_back`](DynamicArray::emplace_back) | strong |
//! | [`emplace`](DynamicArray::emplace), [`insert`](DynamicArray::insert) | strong when growing, basic when shifting in place |
//! | [`assign_from`](DynamicArray::assign_from) | strong when reallocating, basic when reusing storage |
//! | [`erase`](DynamicArray::erase) | basic |
//!
//! # Positions
//!
//! Positions are plain offsets. Any operation that reallocates invalidates all
//! references into the array; operations that shift in place invalidate
//! positions from the modification point onward.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::{mem, ptr};

use contig_buffer::RawBuffer;
use contig_common::Result;

use crate::element::{Element, Relocation, TryDefault};
use crate::growth;
use crate::guard::{InitGuard, copy_into};

/// A contiguous, growable sequence of `T` built on explicitly managed raw storage.
///
/// ```
/// use contig::DynamicArray;
///
/// let mut values = DynamicArray::new();
/// for v in 1..=5 {
///     values.push_back(v).unwrap();
/// }
/// assert_eq!(values.capacity(), 8);
///
/// values.erase(2).unwrap();
/// values.insert(0, 0).unwrap();
/// assert_eq!(values.as_slice(), &[0, 1, 2, 4, 5]);
/// ```
pub struct DynamicArray<T> {
    buf: RawBuffer<T>,
    len: usize,
    _owns: PhantomData<T>,
}

impl<T> DynamicArray<T> {
    /// Creates an empty array with zero capacity.
    #[inline]
    pub const fn new() -> DynamicArray<T> {
        DynamicArray {
            buf: RawBuffer::new(),
            len: 0,
            _owns: PhantomData,
        }
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots available without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[0, len)` are live.
        unsafe { self.buf.prefix(self.len) }
    }

    /// Returns the live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots `[0, len)` are live.
        unsafe { self.buf.prefix_mut(self.len) }
    }

    /// Returns a raw pointer to the first slot.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Exchanges storage and contents with `other` without touching any element.
    #[inline]
    pub fn swap_with(&mut self, other: &mut DynamicArray<T>) {
        self.buf.swap(&mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Transfers the storage out of `self` in O(1), leaving `self` empty with
    /// zero capacity. No element is moved individually.
    #[inline]
    pub fn take(&mut self) -> DynamicArray<T> {
        mem::take(self)
    }

    /// Move-assigns `source` into `self`: the current contents are dropped, the
    /// storage of `source` is taken over, and `source` is left empty with zero
    /// capacity.
    pub fn assign_moved(&mut self, source: &mut DynamicArray<T>) {
        *self = source.take();
    }

    /// Removes the last element and returns it, or `None` if the array is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is now outside the live prefix.
        Some(unsafe { ptr::read(self.buf.slot(self.len)) })
    }

    /// Destroys the trailing elements so that at most `len` remain.
    ///
    /// Has no effect if `len` is not below the current length. The capacity is
    /// unchanged.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = self.len - len;
        self.len = len;
        // SAFETY: the `tail` slots after `len` were live and are no longer
        // reachable through the array.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.offset(len), tail)) };
    }

    /// Destroys all elements, keeping the capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }
}

impl<T: Element> DynamicArray<T> {
    /// Relocation strategy used for `T` when storage is replaced or shifted.
    pub const RELOCATION: Relocation = Relocation::of::<T>();

    /// Returns the relocation strategy resolved for the element type.
    #[inline]
    pub fn relocation(&self) -> Relocation {
        Self::RELOCATION
    }

    /// Creates an array of `size` default-constructed elements with capacity
    /// exactly `size`.
    ///
    /// If a default construction fails, the elements already constructed are
    /// dropped and the storage is freed before the error is returned.
    pub fn with_size(size: usize) -> Result<DynamicArray<T>>
    where
        T: TryDefault,
    {
        let mut buf = RawBuffer::request(size)?;
        // SAFETY: the guard writes at most `size` slots of `buf`, which outlives it.
        let mut built = unsafe { InitGuard::new(buf.as_mut_ptr()) };
        for _ in 0..size {
            let value = T::try_default()?;
            // SAFETY: fewer than `size` slots have been written so far.
            unsafe { built.push(value) };
        }
        built.disarm();
        Ok(DynamicArray {
            buf,
            len: size,
            _owns: PhantomData,
        })
    }

    /// Copy-constructs a new array holding a duplicate of every element, with
    /// capacity exactly `self.len()`.
    ///
    /// On failure every copy made so far is dropped; `self` is never touched.
    pub fn try_clone(&self) -> Result<DynamicArray<T>> {
        let mut buf = RawBuffer::request(self.len)?;
        // SAFETY: the fresh buffer has room for `len` values and holds none.
        let built = unsafe { copy_into(self.as_slice(), buf.as_mut_ptr()) }?;
        built.disarm();
        Ok(DynamicArray {
            buf,
            len: self.len,
            _owns: PhantomData,
        })
    }

    /// Copy-assigns the contents of `source` into `self`.
    ///
    /// When `source` holds more elements than `self` has capacity for, a full
    /// copy is built first and swapped in, so a failure leaves `self` exactly as
    /// it was. Otherwise the existing storage is reused: the common prefix is
    /// assigned element by element, then surplus elements are destroyed or
    /// copy-constructed. A failure on this path leaves `self` valid but partially
    /// updated.
    pub fn assign_from(&mut self, source: &DynamicArray<T>) -> Result<()> {
        if source.len > self.capacity() {
            let mut copy = source.try_clone()?;
            self.swap_with(&mut copy);
            return Ok(());
        }

        let common = self.len.min(source.len);
        for (dst, src) in self.as_mut_slice()[..common]
            .iter_mut()
            .zip(&source.as_slice()[..common])
        {
            dst.try_assign_from(src)?;
        }

        if source.len < self.len {
            self.truncate(source.len);
        } else {
            let start = self.len;
            for src in &source.as_slice()[start..] {
                let copy = src.try_copy()?;
                // SAFETY: `len < source.len <= capacity`, and the slot is raw.
                unsafe { self.buf.slot(self.len).write(copy) };
                self.len += 1;
            }
        }
        Ok(())
    }

    /// Ensures room for at least `capacity` elements.
    ///
    /// Does nothing if the capacity is already sufficient. Otherwise acquires a
    /// buffer of exactly `capacity` slots and relocates the elements into it. A
    /// failure leaves the array exactly as it was.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        log::trace!(
            "reserving: len={}, capacity={} -> {capacity}, relocation={:?}",
            self.len,
            self.capacity(),
            Self::RELOCATION
        );
        let mut target = RawBuffer::request(capacity)?;
        self.relocate(&mut target, None)
    }

    /// Changes the length to `len`.
    ///
    /// Shrinking destroys the trailing elements. Growing reserves at least `len`
    /// slots and default-constructs the new trailing elements; if one of those
    /// constructions fails, the ones already made are dropped and the length is
    /// left unchanged.
    pub fn resize(&mut self, len: usize) -> Result<()>
    where
        T: TryDefault,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }
        self.reserve(len)?;
        // SAFETY: after `reserve`, slots `[self.len, len)` are raw and in bounds.
        let mut built = unsafe { InitGuard::new(self.buf.offset(self.len)) };
        for _ in self.len..len {
            let value = T::try_default()?;
            // SAFETY: slots `[self.len, len)` are raw and within capacity.
            unsafe { built.push(value) };
        }
        built.disarm();
        self.len = len;
        Ok(())
    }

    /// Appends `value` and returns a reference to it.
    ///
    /// Grows the storage to `max(1, 2 * capacity)` when it is full. Fails only
    /// if the storage cannot grow, in which case `value` is dropped and the
    /// array is unchanged.
    #[inline]
    pub fn push_back(&mut self, value: T) -> Result<&mut T> {
        self.emplace_back(|| Ok(value))
    }

    /// Appends the value produced by `construct` and returns a reference to it.
    ///
    /// When the storage is full, the new value is constructed inside the freshly
    /// acquired buffer before any existing element is relocated, so a failing
    /// `construct` leaves the array untouched.
    pub fn emplace_back<F>(&mut self, construct: F) -> Result<&mut T>
    where
        F: FnOnce() -> Result<T>,
    {
        let index = self.len;
        if self.len < self.capacity() {
            let value = construct()?;
            let slot = self.buf.slot(index);
            // SAFETY: `index < capacity` and the slot is raw.
            unsafe { slot.write(value) };
            self.len += 1;
            // SAFETY: the slot was just made live.
            return Ok(unsafe { &mut *slot });
        }
        self.grow_with(index, construct)?;
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Inserts the value produced by `construct` at position `pos`, shifting the
    /// elements after it one slot to the right. Returns the position of the new
    /// element.
    ///
    /// `pos == len()` appends. When the storage is full, the new element is
    /// constructed in the replacement buffer first and the elements before and
    /// after it are relocated around it; any failure leaves the array exactly as
    /// it was. Otherwise the value is constructed into a temporary, the tail is
    /// shifted in place and the temporary is moved into the vacated slot.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len()`.
    pub fn emplace<F>(&mut self, pos: usize, construct: F) -> Result<usize>
    where
        F: FnOnce() -> Result<T>,
    {
        assert!(
            pos <= self.len,
            "emplace position {pos} out of range for length {}",
            self.len
        );
        if pos == self.len {
            self.emplace_back(construct)?;
            return Ok(pos);
        }
        if self.len == self.capacity() {
            self.grow_with(pos, construct)?;
            return Ok(pos);
        }

        let value = construct()?;
        let base = self.buf.as_mut_ptr();
        match Self::RELOCATION {
            Relocation::Move => unsafe {
                // SAFETY: `len < capacity`, so the shifted range stays in bounds.
                ptr::copy(base.add(pos), base.add(pos + 1), self.len - pos);
                base.add(pos).write(value);
                self.len += 1;
            },
            Relocation::Copy => {
                // Extend the live range with a copy of the last element.
                // SAFETY: `pos < len`, so slot `len - 1` is live.
                let last = unsafe { &*base.add(self.len - 1) };
                let copy = last.try_copy()?;
                // SAFETY: `len < capacity` and slot `len` is raw.
                unsafe { base.add(self.len).write(copy) };
                self.len += 1;

                for i in (pos + 1..self.len - 1).rev() {
                    // SAFETY: `i` and `i - 1` are distinct live slots.
                    unsafe { (*base.add(i)).try_assign_from(&*base.add(i - 1)) }?;
                }
                // SAFETY: `pos` is a live slot; its old value is dropped.
                unsafe { *base.add(pos) = value };
            }
        }
        Ok(pos)
    }

    /// Inserts `value` at position `pos`. See [`DynamicArray::emplace`].
    ///
    /// # Panics
    ///
    /// Panics if `pos > len()`.
    #[inline]
    pub fn insert(&mut self, pos: usize, value: T) -> Result<usize> {
        self.emplace(pos, || Ok(value))
    }

    /// Removes the element at `pos`, shifting the elements after it one slot to
    /// the left. Returns `pos`, which now refers to the element that followed the
    /// removed one (or to the end).
    ///
    /// Element types relocated by copy are shifted by copy-assignment; a failure
    /// midway leaves the array valid with the same length, its contents
    /// partially shifted.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len()`.
    pub fn erase(&mut self, pos: usize) -> Result<usize> {
        assert!(
            pos < self.len,
            "erase position {pos} out of range for length {}",
            self.len
        );
        let base = self.buf.as_mut_ptr();
        match Self::RELOCATION {
            Relocation::Move => unsafe {
                let removed = ptr::read(base.add(pos));
                ptr::copy(base.add(pos + 1), base.add(pos), self.len - pos - 1);
                self.len -= 1;
                drop(removed);
            },
            Relocation::Copy => {
                for i in pos..self.len - 1 {
                    // SAFETY: `i` and `i + 1` are distinct live slots.
                    unsafe { (*base.add(i)).try_assign_from(&*base.add(i + 1)) }?;
                }
                self.truncate(self.len - 1);
            }
        }
        Ok(pos)
    }

    /// Grows a full array, placing the value produced by `construct` at `pos`.
    fn grow_with<F>(&mut self, pos: usize, construct: F) -> Result<()>
    where
        F: FnOnce() -> Result<T>,
    {
        let capacity = growth::next_capacity::<T>(self.capacity())?;
        log::trace!(
            "growing: len={}, capacity={} -> {capacity}, position={pos}, relocation={:?}",
            self.len,
            self.capacity(),
            Self::RELOCATION
        );
        let mut target: RawBuffer<T> = RawBuffer::request(capacity)?;
        let slot = target.slot(pos);
        let value = construct()?;
        // SAFETY: `pos <= len < capacity` of the fresh buffer.
        unsafe { slot.write(value) };
        // Declared after `target`, so on failure the value is dropped before the
        // buffer is freed.
        // SAFETY: the slot was just written and nothing else owns it yet.
        let placed = unsafe { InitGuard::occupied(slot, 1) };
        self.relocate(&mut target, Some(pos))?;
        placed.disarm();
        Ok(())
    }

    /// Transfers all elements into `target`, leaving a one-slot gap at `gap`
    /// if given, then swaps `target` in as the array's storage.
    ///
    /// On failure nothing in `self` has changed and whatever was built in
    /// `target` (except the gap slot, which belongs to the caller) has been
    /// dropped.
    fn relocate(&mut self, target: &mut RawBuffer<T>, gap: Option<usize>) -> Result<()> {
        let len = self.len;
        let split = gap.unwrap_or(len);
        let resume = gap.map_or(len, |pos| pos + 1);
        debug_assert!(target.capacity() >= len + usize::from(gap.is_some()));

        let dst = target.as_mut_ptr();
        match Self::RELOCATION {
            Relocation::Move => unsafe {
                let src = self.buf.as_ptr();
                ptr::copy_nonoverlapping(src, dst, split);
                ptr::copy_nonoverlapping(src.add(split), dst.add(resume), len - split);
                // The old slots no longer own their values.
                self.len = 0;
            },
            Relocation::Copy => {
                let live = self.as_slice();
                // SAFETY: both runs land on raw slots of `target` around the gap.
                let head = unsafe { copy_into(&live[..split], dst) }?;
                let tail = unsafe { copy_into(&live[split..], dst.add(resume)) }?;
                head.disarm();
                tail.disarm();
                self.clear();
            }
        }

        self.buf.swap(target);
        self.len = len + usize::from(gap.is_some());
        Ok(())
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // SAFETY: slots `[0, len)` are live; the buffer frees the storage after.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        DynamicArray::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// # Panics
    ///
    /// Panics if the storage cannot be allocated.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(e) => panic!("failed to clone DynamicArray: {e}"),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(e) = self.assign_from(source) {
            panic!("failed to assign DynamicArray: {e}");
        }
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynamicArray<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicArray")
            .field("values", &self.as_slice())
            .field("len", &self.len)
            .field("cap", &self.capacity())
            .finish()
    }
}
