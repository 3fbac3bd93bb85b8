//! Capacity growth policy.

use contig_common::{Result, result::checked_capacity};

/// Capacity of the first allocation made by an append into empty storage.
pub const INITIAL_CAPACITY: usize = 1;

/// Factor applied to a full array's capacity on append.
pub const GROWTH_FACTOR: usize = 2;

/// Returns the capacity to grow to when storage of `current` slots of `T` is full:
/// `max(INITIAL_CAPACITY, GROWTH_FACTOR * current)`.
pub fn next_capacity<T>(current: usize) -> Result<usize> {
    if current == 0 {
        return Ok(INITIAL_CAPACITY);
    }
    checked_capacity(
        current.checked_mul(GROWTH_FACTOR),
        current,
        std::mem::size_of::<T>(),
    )
}
