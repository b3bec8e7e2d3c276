//! Column variants: scalar, dense float vector and binary vector
//!
//! The three element shapes differ only in which primitive they store and how
//! the configured width turns into a storage dimension. Each shape is a
//! zero-sized [`ElementLayout`] type, and [`ConcurrentColumn`] is generic over
//! it.
//!
//! | Layout         | Element | Configured width    | Storage dimension |
//! |----------------|---------|---------------------|-------------------|
//! | `Scalar<T>`    | `T`     | 1                   | 1                 |
//! | `FloatVector`  | `f32`   | dim >= 2            | dim               |
//! | `BinaryVector` | `u8`    | bits, multiple of 8 | bits / 8 (>= 2)   |

use super::chunk::Chunk;
use super::config::ColumnConfig;
use super::error::{ColumnError, ColumnResult};
use super::store::{ColumnStats, ColumnStore, TypedColumnStore};
use super::types::{ChunkId, DataType, Element, RawSource, ScalarElement};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Element shape of a column
pub trait ElementLayout: Send + Sync + 'static {
    /// Primitive stored in each chunk
    type Elem: Element;

    const DATA_TYPE: DataType;

    const IS_SCALAR: bool;

    /// Storage dimension for a configured width, or why the width is invalid
    fn storage_dimension(width: usize) -> ColumnResult<usize>;
}

/// Single fixed-width primitive per row
pub struct Scalar<T>(PhantomData<T>);

impl<T: ScalarElement> ElementLayout for Scalar<T> {
    type Elem = T;
    const DATA_TYPE: DataType = T::DATA_TYPE;
    const IS_SCALAR: bool = true;

    fn storage_dimension(width: usize) -> ColumnResult<usize> {
        if width != 1 {
            return Err(ColumnError::InvalidDimension {
                data_type: T::DATA_TYPE,
                dim: width,
                reason: "scalar columns have dimension 1",
            });
        }
        Ok(1)
    }
}

/// Dense `f32` embedding
pub struct FloatVector;

impl ElementLayout for FloatVector {
    type Elem = f32;
    const DATA_TYPE: DataType = DataType::FloatVector;
    const IS_SCALAR: bool = false;

    fn storage_dimension(width: usize) -> ColumnResult<usize> {
        if width < 2 {
            return Err(ColumnError::InvalidDimension {
                data_type: DataType::FloatVector,
                dim: width,
                reason: "vector columns need at least 2 components",
            });
        }
        Ok(width)
    }
}

/// Bit vector packed eight bits per byte
pub struct BinaryVector;

impl ElementLayout for BinaryVector {
    type Elem = u8;
    const DATA_TYPE: DataType = DataType::BinaryVector;
    const IS_SCALAR: bool = false;

    fn storage_dimension(bits: usize) -> ColumnResult<usize> {
        // One packed byte would make a vector store of dimension 1
        if bits % 8 != 0 || bits / 8 < 2 {
            return Err(ColumnError::InvalidBinaryWidth { bits });
        }
        Ok(bits / 8)
    }
}

/// A column of one element shape
pub struct ConcurrentColumn<L: ElementLayout> {
    store: TypedColumnStore<L::Elem>,

    /// Width as configured (bit-width for binary vectors)
    width: usize,

    _layout: PhantomData<L>,
}

pub type ScalarColumn<T> = ConcurrentColumn<Scalar<T>>;
pub type FloatVectorColumn = ConcurrentColumn<FloatVector>;
pub type BinaryVectorColumn = ConcurrentColumn<BinaryVector>;

impl<L: ElementLayout> ConcurrentColumn<L> {
    /// Build a column of `width` and `chunk_capacity` elements per chunk
    pub fn with_width(width: usize, chunk_capacity: usize) -> ColumnResult<Self> {
        let dimension = L::storage_dimension(width)?;
        let store = TypedColumnStore::new(dimension, chunk_capacity)?;
        tracing::debug!(
            data_type = %L::DATA_TYPE,
            width,
            dimension,
            chunk_capacity,
            "created column"
        );
        Ok(Self {
            store,
            width,
            _layout: PhantomData,
        })
    }

    /// Underlying typed store
    pub fn store(&self) -> &TypedColumnStore<L::Elem> {
        &self.store
    }

    /// Width as configured at construction
    pub fn configured_width(&self) -> usize {
        self.width
    }

    pub fn is_scalar(&self) -> bool {
        L::IS_SCALAR
    }

    pub fn write(&self, element_offset: usize, source: &[L::Elem], element_count: usize) {
        self.store.write(element_offset, source, element_count);
    }

    /// Holding a guard from the returned chunk delays appends into it
    pub fn read_chunk(&self, chunk_index: ChunkId) -> Arc<Chunk<L::Elem>> {
        self.store.read_chunk(chunk_index)
    }

    pub fn read_element(&self, element_index: usize) -> Vec<L::Elem> {
        self.store.read_element(element_index)
    }

    pub fn read_range(&self, element_offset: usize, element_count: usize) -> Vec<L::Elem> {
        self.store.read_range(element_offset, element_count)
    }
}

impl<T: ScalarElement> ScalarColumn<T> {
    pub fn new(chunk_capacity: usize) -> ColumnResult<Self> {
        Self::with_width(1, chunk_capacity)
    }

    pub fn from_config(config: &ColumnConfig) -> ColumnResult<Self> {
        config.validate()?;
        Self::new(config.chunk_capacity)
    }

    /// Value at row `element_index`
    pub fn get(&self, element_index: usize) -> T {
        self.store.get(element_index)
    }
}

impl FloatVectorColumn {
    pub fn new(dim: usize, chunk_capacity: usize) -> ColumnResult<Self> {
        Self::with_width(dim, chunk_capacity)
    }

    pub fn from_config(dim: usize, config: &ColumnConfig) -> ColumnResult<Self> {
        config.validate()?;
        Self::new(dim, config.chunk_capacity)
    }
}

impl BinaryVectorColumn {
    /// `bits` must be a multiple of 8 and at least 16
    pub fn new(bits: usize, chunk_capacity: usize) -> ColumnResult<Self> {
        Self::with_width(bits, chunk_capacity)
    }

    pub fn from_config(bits: usize, config: &ColumnConfig) -> ColumnResult<Self> {
        config.validate()?;
        Self::new(bits, config.chunk_capacity)
    }

    /// Vector width in bits
    pub fn binary_dim(&self) -> usize {
        self.width
    }
}

impl<L: ElementLayout> ColumnStore for ConcurrentColumn<L> {
    fn data_type(&self) -> DataType {
        L::DATA_TYPE
    }

    fn chunk_capacity(&self) -> usize {
        self.store.chunk_capacity()
    }

    fn dimension(&self) -> usize {
        self.store.dimension()
    }

    fn grow_to_at_least(&self, element_count: usize) {
        self.store.grow_to_at_least(element_count);
    }

    fn write_raw(
        &self,
        element_offset: usize,
        source: RawSource<'_>,
        element_count: usize,
    ) -> ColumnResult<()> {
        self.store.write_raw(element_offset, source, element_count)
    }

    fn num_chunks(&self) -> usize {
        self.store.num_chunks()
    }

    fn stats(&self) -> ColumnStats {
        self.store.stats()
    }
}

impl<L: ElementLayout> fmt::Debug for ConcurrentColumn<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentColumn")
            .field("data_type", &L::DATA_TYPE)
            .field("width", &self.width)
            .field("store", &self.store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_column() {
        let column = ScalarColumn::<i64>::new(4).unwrap();
        assert!(column.is_scalar());
        assert_eq!(column.data_type(), DataType::Int64);
        assert_eq!(column.dimension(), 1);

        let values: Vec<i64> = (100..110).collect();
        column.write(0, &values, 10);
        assert_eq!(column.num_chunks(), 3);
        assert_eq!(column.get(9), 109);
    }

    #[test]
    fn test_float_vector_dimension() {
        let column = FloatVectorColumn::new(128, 16).unwrap();
        assert!(!column.is_scalar());
        assert_eq!(column.dimension(), 128);
        assert_eq!(column.configured_width(), 128);
        assert_eq!(column.data_type(), DataType::FloatVector);
    }

    #[test]
    fn test_float_vector_rejects_dimension_one() {
        let result = FloatVectorColumn::new(1, 16);
        assert!(matches!(
            result,
            Err(ColumnError::InvalidDimension { dim: 1, .. })
        ));
        assert!(FloatVectorColumn::new(0, 16).is_err());
    }

    #[test]
    fn test_scalar_rejects_wider_width() {
        let result = ScalarColumn::<f64>::with_width(4, 16);
        assert!(matches!(
            result,
            Err(ColumnError::InvalidDimension { dim: 4, .. })
        ));
    }

    #[test]
    fn test_binary_vector_width() {
        let column = BinaryVectorColumn::new(128, 16).unwrap();
        assert_eq!(column.dimension(), 16);
        assert_eq!(column.binary_dim(), 128);
        assert_eq!(column.data_type(), DataType::BinaryVector);

        assert!(matches!(
            BinaryVectorColumn::new(12, 16),
            Err(ColumnError::InvalidBinaryWidth { bits: 12 })
        ));
        assert!(BinaryVectorColumn::new(0, 16).is_err());
        assert!(matches!(
            BinaryVectorColumn::new(8, 16),
            Err(ColumnError::InvalidBinaryWidth { bits: 8 })
        ));
        assert_eq!(BinaryVectorColumn::new(16, 16).unwrap().dimension(), 2);
    }

    #[test]
    fn test_binary_vector_write() {
        let column = BinaryVectorColumn::new(16, 2).unwrap();
        column.write(1, &[0xAA, 0x55, 0xFF, 0x00], 2);

        assert_eq!(column.num_chunks(), 2);
        assert_eq!(column.read_element(1), vec![0xAA, 0x55]);
        assert_eq!(column.read_element(2), vec![0xFF, 0x00]);
        assert_eq!(column.read_chunk(0).to_vec(), vec![0, 0, 0xAA, 0x55]);
    }

    #[test]
    fn test_from_config_validates() {
        let config = ColumnConfig::new(0);
        assert!(ScalarColumn::<i32>::from_config(&config).is_err());
        assert!(FloatVectorColumn::from_config(8, &config).is_err());

        let config = ColumnConfig::new(64);
        let column = BinaryVectorColumn::from_config(256, &config).unwrap();
        assert_eq!(column.chunk_capacity(), 64);
        assert_eq!(column.dimension(), 32);
    }
}
