use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn allocation_failed(bytes: usize, align: usize) -> Error {
        Error(ErrorKind::AllocationFailed { bytes, align }.into())
    }

    pub fn capacity_overflow(capacity: usize, element_size: usize) -> Error {
        Error(
            ErrorKind::CapacityOverflow {
                capacity,
                element_size,
            }
            .into(),
        )
    }

    /// An element type reports that one of its operations failed.
    ///
    /// `operation` names the failed operation (`"copy"`, `"assign"`,
    /// `"default"`, `"construct"`, ...).
    pub fn element(operation: &'static str, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::Element {
                operation,
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn not_copyable(type_name: &'static str) -> Error {
        Error(ErrorKind::NotCopyable { type_name }.into())
    }

    /// Returns `true` for failures raised by the allocator or by size arithmetic,
    /// as opposed to failures raised by element code.
    pub fn is_allocation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::AllocationFailed { .. } | ErrorKind::CapacityOverflow { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("memory allocation of {bytes} bytes (align {align}) failed")]
    AllocationFailed { bytes: usize, align: usize },

    #[error("capacity overflow: {capacity} elements of {element_size} bytes")]
    CapacityOverflow {
        capacity: usize,
        element_size: usize,
    },

    #[error("element {operation} failed: {message}")]
    Element {
        operation: &'static str,
        message: String,
    },

    #[error("element type {type_name} cannot be copied")]
    NotCopyable { type_name: &'static str },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
