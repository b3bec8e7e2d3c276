//! Common types for chunked columns

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a chunk within a column
pub type ChunkId = usize;

/// Primitive component type held by a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    Float,
    Double,
}

impl PrimitiveType {
    /// Size of one component in bytes
    pub fn size_of(self) -> usize {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => 1,
            Self::Int16 => 2,
            Self::Int32 | Self::Float => 4,
            Self::Int64 | Self::Double => 8,
        }
    }
}

/// Logical field type reported by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    FloatVector,
    BinaryVector,
}

impl DataType {
    pub fn is_vector(self) -> bool {
        matches!(self, Self::FloatVector | Self::BinaryVector)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::Double => "double",
            Self::FloatVector => "float_vector",
            Self::BinaryVector => "binary_vector",
        };
        f.write_str(name)
    }
}

/// Borrowed source buffer tagged with its primitive type
///
/// This is the type-erased form accepted by the ingestion path: callers that
/// do not know a column's concrete element type hand over a typed slice, and
/// the column checks the tag at runtime before copying.
#[derive(Debug, Clone, Copy)]
pub enum RawSource<'a> {
    Bool(&'a [bool]),
    Int8(&'a [i8]),
    Int16(&'a [i16]),
    Int32(&'a [i32]),
    Int64(&'a [i64]),
    UInt8(&'a [u8]),
    Float(&'a [f32]),
    Double(&'a [f64]),
}

impl RawSource<'_> {
    /// Runtime tag of the borrowed values
    pub fn primitive(&self) -> PrimitiveType {
        match self {
            Self::Bool(_) => PrimitiveType::Bool,
            Self::Int8(_) => PrimitiveType::Int8,
            Self::Int16(_) => PrimitiveType::Int16,
            Self::Int32(_) => PrimitiveType::Int32,
            Self::Int64(_) => PrimitiveType::Int64,
            Self::UInt8(_) => PrimitiveType::UInt8,
            Self::Float(_) => PrimitiveType::Float,
            Self::Double(_) => PrimitiveType::Double,
        }
    }

    /// Number of primitive values (not logical elements)
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(s) => s.len(),
            Self::Int8(s) => s.len(),
            Self::Int16(s) => s.len(),
            Self::Int32(s) => s.len(),
            Self::Int64(s) => s.len(),
            Self::UInt8(s) => s.len(),
            Self::Float(s) => s.len(),
            Self::Double(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A primitive that can be stored in a chunk
pub trait Element: Copy + Default + PartialEq + Send + Sync + fmt::Debug + 'static {
    const PRIMITIVE: PrimitiveType;

    /// Wrap a typed slice as a [`RawSource`]
    fn erase(values: &[Self]) -> RawSource<'_>;

    /// Recover a typed slice if the tag matches `Self`
    fn downcast(source: RawSource<'_>) -> Option<&[Self]>;
}

/// An [`Element`] that can back a scalar field
pub trait ScalarElement: Element {
    const DATA_TYPE: DataType;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const PRIMITIVE: PrimitiveType = PrimitiveType::$variant;

            fn erase(values: &[Self]) -> RawSource<'_> {
                RawSource::$variant(values)
            }

            fn downcast(source: RawSource<'_>) -> Option<&[Self]> {
                match source {
                    RawSource::$variant(values) => Some(values),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(bool, Bool);
impl_element!(i8, Int8);
impl_element!(i16, Int16);
impl_element!(i32, Int32);
impl_element!(i64, Int64);
impl_element!(u8, UInt8);
impl_element!(f32, Float);
impl_element!(f64, Double);

macro_rules! impl_scalar_element {
    ($ty:ty, $data_type:ident) => {
        impl ScalarElement for $ty {
            const DATA_TYPE: DataType = DataType::$data_type;
        }
    };
}

impl_scalar_element!(bool, Bool);
impl_scalar_element!(i8, Int8);
impl_scalar_element!(i16, Int16);
impl_scalar_element!(i32, Int32);
impl_scalar_element!(i64, Int64);
impl_scalar_element!(f32, Float);
impl_scalar_element!(f64, Double);

/// Location of a logical element inside the chunk sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementPosition {
    /// The chunk holding the element
    pub chunk_id: ChunkId,
    /// Element index within that chunk (not a component index)
    pub chunk_offset: usize,
}

impl ElementPosition {
    /// Split a column-wide element index into chunk id and offset
    #[inline]
    pub fn locate(element_index: usize, chunk_capacity: usize) -> Self {
        Self {
            chunk_id: element_index / chunk_capacity,
            chunk_offset: element_index % chunk_capacity,
        }
    }

    /// Elements left in the chunk from this position onward
    #[inline]
    pub fn remaining_in_chunk(&self, chunk_capacity: usize) -> usize {
        chunk_capacity - self.chunk_offset
    }
}

/// Number of chunks needed to hold `element_count` elements
#[inline]
pub fn chunks_for(element_count: usize, chunk_capacity: usize) -> usize {
    element_count.div_ceil(chunk_capacity)
}
