//! Instrumented element types.
//!
//! Each type reports its lifecycle to [`Probe`]. None of them implements
//! `Clone` or `Default`; their copy and default behavior goes through
//! [`Element`] and [`TryDefault`] so that failures can be injected.

use contig::{Element, TryDefault};
use contig_common::Result;

use crate::probe::Probe;

/// Access to the payload of an instrumented value.
pub trait Value {
    fn value(&self) -> i64;
}

/// Collects the payloads of `items`.
pub fn values<T: Value>(items: &[T]) -> Vec<i64> {
    items.iter().map(Value::value).collect()
}

macro_rules! copyable_element {
    ($(#[$meta:meta])* $name:ident, infallible_move = $infallible:expr) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq)]
        pub struct $name {
            value: i64,
        }

        impl $name {
            pub fn new(value: i64) -> $name {
                Probe::on_construct();
                $name { value }
            }
        }

        impl Value for $name {
            fn value(&self) -> i64 {
                self.value
            }
        }

        impl Element for $name {
            const INFALLIBLE_MOVE: bool = $infallible;
            const COPYABLE: bool = true;

            fn try_copy(&self) -> Result<Self> {
                Probe::on_copy()?;
                Ok($name { value: self.value })
            }

            fn try_assign_from(&mut self, source: &Self) -> Result<()> {
                Probe::on_assign()?;
                self.value = source.value;
                Ok(())
            }
        }

        impl TryDefault for $name {
            fn try_default() -> Result<Self> {
                Probe::on_default()?;
                Ok($name { value: 0 })
            }
        }

        impl Drop for $name {
            fn drop(&mut self) {
                Probe::on_drop();
            }
        }
    };
}

copyable_element!(
    /// Copyable element whose move is not declared infallible, so arrays of it
    /// relocate by copy.
    Tracked,
    infallible_move = false
);

copyable_element!(
    /// Copyable element with an infallible move, so arrays of it relocate by
    /// move and never copy during growth.
    NothrowTracked,
    infallible_move = true
);

/// Element that cannot be copied at all.
#[derive(Debug, PartialEq, Eq)]
pub struct MoveOnly {
    value: i64,
}

impl MoveOnly {
    pub fn new(value: i64) -> MoveOnly {
        Probe::on_construct();
        MoveOnly { value }
    }
}

impl Value for MoveOnly {
    fn value(&self) -> i64 {
        self.value
    }
}

impl Element for MoveOnly {}

impl Drop for MoveOnly {
    fn drop(&mut self) {
        Probe::on_drop();
    }
}
