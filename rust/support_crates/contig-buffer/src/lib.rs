//! Owned regions of raw, uninitialized element storage.
//!
//! [`RawBuffer`] acquires and releases memory for a fixed number of element
//! slots. It never constructs or destroys elements; tracking which slots hold
//! live values is entirely up to the owner.

pub mod raw_buffer;

pub use raw_buffer::RawBuffer;
