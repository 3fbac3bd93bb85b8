//! Test utilities for the contig crates.
//!
//! This crate provides:
//! - [`Probe`], per-thread counters of element lifecycle events plus failure
//!   injection for copies and default constructions
//! - instrumented element types covering each relocation strategy
//!   ([`Tracked`], [`NothrowTracked`], [`MoveOnly`])
//!
//! Counters live in thread-local storage, so tests running in parallel on the
//! default harness do not observe each other.

pub mod elements;
pub mod probe;

pub use elements::{MoveOnly, NothrowTracked, Tracked, Value, values};
pub use probe::{Counters, Probe};
