//! Column error types
//!
//! Only configuration and type-erased ingestion failures are reported here.
//! Out-of-range indices and accessor misuse are caller bugs and panic at the
//! call site instead of producing a `ColumnError`.

use super::types::{DataType, PrimitiveType};

/// Result type for column operations
pub type ColumnResult<T> = Result<T, ColumnError>;

/// Errors that can occur while building or feeding a column
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    /// Chunk capacity must hold at least one element
    #[error("Invalid chunk capacity {capacity}: must be at least 1")]
    InvalidChunkCapacity { capacity: usize },

    /// Dimension does not fit the requested element layout
    ///
    /// Scalar columns require exactly 1, dense vectors require at least 2.
    #[error("Invalid dimension {dim} for {data_type:?}: {reason}")]
    InvalidDimension {
        data_type: DataType,
        dim: usize,
        reason: &'static str,
    },

    /// Store dimension must be at least 1
    #[error("Invalid dimension 0 for {primitive:?} store")]
    ZeroDimension { primitive: PrimitiveType },

    /// Binary vector width is not a multiple of 8 bits spanning at least 2 bytes
    #[error("Invalid binary vector width {bits}: must be a multiple of 8 and at least 16")]
    InvalidBinaryWidth { bits: usize },

    /// Type-erased source carries a different primitive than the column stores
    #[error("Type mismatch: column stores {expected:?}, source holds {actual:?}")]
    TypeMismatch {
        expected: PrimitiveType,
        actual: PrimitiveType,
    },

    /// Type-erased source is shorter than `element_count * dimension`
    #[error("Source too short: need {expected} values, got {actual}")]
    SourceLength { expected: usize, actual: usize },

    /// Field spec names a type that cannot be stored as a column
    #[error("Unsupported field '{name}': {reason}")]
    UnsupportedField { name: String, reason: String },

    /// Two field specs share a name
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    /// No column registered under the given field name
    #[error("Field not found: {0}")]
    FieldNotFound(String),
}
