//! Column configuration
//!
//! Chunk capacity and field shapes are decided by the segment layer once, when
//! a growing segment is created, and never change afterwards.

use super::error::{ColumnError, ColumnResult};
use super::types::DataType;
use serde::{Deserialize, Serialize};

/// Default number of rows per chunk for a growing segment
pub const DEFAULT_CHUNK_CAPACITY: usize = 32 * 1024;

/// Per-segment column configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Logical elements per chunk
    pub chunk_capacity: usize,
}

impl ColumnConfig {
    pub fn new(chunk_capacity: usize) -> Self {
        Self { chunk_capacity }
    }

    pub fn validate(&self) -> ColumnResult<()> {
        if self.chunk_capacity == 0 {
            return Err(ColumnError::InvalidChunkCapacity {
                capacity: self.chunk_capacity,
            });
        }
        Ok(())
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
        }
    }
}

/// Shape of one field in a segment schema
///
/// `dim` is the embedding width for float vectors and the bit-width for
/// binary vectors. Scalars leave it unset (or set it to 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim: Option<usize>,
}

impl FieldSpec {
    pub fn scalar(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            dim: None,
        }
    }

    pub fn vector(name: impl Into<String>, data_type: DataType, dim: usize) -> Self {
        Self {
            name: name.into(),
            data_type,
            dim: Some(dim),
        }
    }

    /// Width to hand to the column constructor
    ///
    /// Vector fields without a `dim` are rejected here rather than defaulted.
    pub fn width(&self) -> ColumnResult<usize> {
        match (self.data_type.is_vector(), self.dim) {
            (true, Some(dim)) => Ok(dim),
            (true, None) => Err(ColumnError::UnsupportedField {
                name: self.name.clone(),
                reason: format!("{} field requires dim", self.data_type),
            }),
            (false, None) => Ok(1),
            (false, Some(dim)) => Ok(dim),
        }
    }
}
