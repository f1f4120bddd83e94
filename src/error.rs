//! Error types for the serializer
//!
//! The engine has exactly two failure kinds: the input graph is
//! structurally unusable, or the destination buffer cannot hold the
//! output. Both are returned through the result channel; the engine
//! never panics or logs on its own.

#[cfg(feature = "std")]
use thiserror::Error;

/// Result type alias for serializer operations
pub type Result<T> = core::result::Result<T, SerializeError>;

/// Errors during serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum SerializeError {
    /// Gateway graph failed structural validation (empty readings,
    /// a reading with no data points, or counts beyond the u8 bound)
    #[cfg_attr(feature = "std", error("invalid gateway data"))]
    InvalidInput,

    /// A text field exceeds its declared maximum length
    #[cfg_attr(
        feature = "std",
        error("field `{field}` is {len} bytes, limit is {max}")
    )]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// Destination buffer is empty or too small for the output
    #[cfg_attr(
        feature = "std",
        error("buffer too small: need {needed} bytes, have {available}")
    )]
    BufferTooSmall { needed: usize, available: usize },
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SerializeError::InvalidInput => write!(f, "invalid gateway data"),
            SerializeError::FieldTooLong { field, len, max } => {
                write!(f, "field `{}` is {} bytes, limit is {}", field, len, max)
            }
            SerializeError::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {} bytes, have {}", needed, available)
            }
        }
    }
}

impl SerializeError {
    /// Map onto the wire-level integer contract used by C callers:
    /// -1 for buffer failures, -2 for anything wrong with the input.
    pub fn code(&self) -> i32 {
        match self {
            SerializeError::BufferTooSmall { .. } => -1,
            SerializeError::InvalidInput | SerializeError::FieldTooLong { .. } => -2,
        }
    }
}
