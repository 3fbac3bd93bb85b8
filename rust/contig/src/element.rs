//! Element capabilities consulted by the storage engine.
//!
//! Moving a value in Rust is a bitwise relocation that cannot fail, but an
//! element type may still declare that relocation must not be trusted, in which
//! case growth duplicates elements instead so that a failure midway leaves the
//! original storage untouched. The declaration is made through associated
//! constants, so the choice is resolved per type at compile time.

use contig_common::{Error, Result};

/// Capabilities an element type exposes to [`DynamicArray`](crate::DynamicArray).
///
/// Every `T: Clone` is an `Element` through a blanket implementation: it moves
/// infallibly and copies with `Clone`. Types whose duplication can fail, or
/// move-only types that are not `Clone`, implement this trait by hand.
///
/// ```
/// use contig::{DynamicArray, Element, Relocation};
///
/// struct Handle(u32);
///
/// // Move-only: keeps the defaults.
/// impl Element for Handle {}
///
/// assert_eq!(Relocation::of::<Handle>(), Relocation::Move);
///
/// let mut handles = DynamicArray::new();
/// handles.push_back(Handle(7)).unwrap();
/// assert_eq!(handles[0].0, 7);
/// ```
pub trait Element: Sized {
    /// `true` when relocating a value into new storage can never fail.
    const INFALLIBLE_MOVE: bool = true;

    /// `true` when the type supports [`Element::try_copy`].
    const COPYABLE: bool = false;

    /// Copy-constructs a new, independent value from `self`.
    fn try_copy(&self) -> Result<Self> {
        Err(Error::not_copyable(std::any::type_name::<Self>()))
    }

    /// Copy-assigns `source` into `self`.
    ///
    /// On failure `self` must remain a valid, droppable value.
    fn try_assign_from(&mut self, source: &Self) -> Result<()> {
        *self = source.try_copy()?;
        Ok(())
    }
}

impl<T: Clone> Element for T {
    const COPYABLE: bool = true;

    #[inline]
    fn try_copy(&self) -> Result<Self> {
        Ok(self.clone())
    }

    #[inline]
    fn try_assign_from(&mut self, source: &Self) -> Result<()> {
        self.clone_from(source);
        Ok(())
    }
}

/// Fallible default construction, required by sized construction and `resize`.
pub trait TryDefault: Sized {
    fn try_default() -> Result<Self>;
}

impl<T: Default> TryDefault for T {
    #[inline]
    fn try_default() -> Result<Self> {
        Ok(T::default())
    }
}

/// How elements are transferred when storage is replaced or shifted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relocation {
    /// Bitwise transfer; the source slot is dead afterwards.
    Move,
    /// Duplication; the source slot stays live until explicitly destroyed.
    Copy,
}

impl Relocation {
    /// Resolves the strategy for `T`: move when moving cannot fail or when the
    /// type cannot be copied at all, copy otherwise.
    pub const fn of<T: Element>() -> Relocation {
        if T::INFALLIBLE_MOVE || !T::COPYABLE {
            Relocation::Move
        } else {
            Relocation::Copy
        }
    }

    #[inline]
    pub const fn is_move(self) -> bool {
        matches!(self, Relocation::Move)
    }
}
