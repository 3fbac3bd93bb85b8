pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Converts the outcome of a checked size computation into a `Result`,
/// reporting `None` as a capacity overflow for `capacity` elements of
/// `element_size` bytes.
#[inline]
pub fn checked_capacity<T>(value: Option<T>, capacity: usize, element_size: usize) -> Result<T> {
    match value {
        Some(value) => Ok(value),
        None => capacity_overflow(capacity, element_size),
    }
}

#[cold]
pub fn capacity_overflow<T>(capacity: usize, element_size: usize) -> Result<T> {
    Err(crate::error::ErrorKind::CapacityOverflow {
        capacity,
        element_size,
    }
    .into())
}
