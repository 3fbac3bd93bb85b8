//! A contiguous, growable sequence container with an explicit storage engine.
//!
//! Raw memory comes from [`contig_buffer::RawBuffer`], which only allocates and
//! frees. [`DynamicArray`] decides when each slot turns from raw to live and
//! back, grows with amortized O(1) cost, and picks between relocating
//! elements by move or by copy according to the capabilities the element type
//! declares through [`Element`].
//!
//! Element operations that can fail (copy, assignment, default or in-place
//! construction) return [`Result`]; every mutator documents whether a failure
//! leaves the array untouched or merely valid.
//!
//! ```
//! use contig::DynamicArray;
//!
//! let mut a = DynamicArray::<u32>::with_size(3)?;
//! a[1] = 7;
//! let b = a.try_clone()?;
//! a.push_back(9)?;
//! assert_eq!(a.as_slice(), &[0, 7, 0, 9]);
//! assert_eq!(b.as_slice(), &[0, 7, 0]);
//! # Ok::<(), contig::Error>(())
//! ```

pub mod array;
pub mod element;
pub mod growth;
mod guard;

pub use array::DynamicArray;
pub use contig_common::{Error, ErrorKind, Result};
pub use element::{Element, Relocation, TryDefault};

#[cfg(test)]
mod tests;
