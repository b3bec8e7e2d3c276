//! Typed column store
//!
//! Maps a logical element index space onto a [`GrowableChunkList`]. Each
//! logical element is `dimension` primitive values stored contiguously; each
//! chunk holds `chunk_capacity` elements. Writes may start anywhere and run
//! across any number of chunk boundaries.
//!
//! ## Synchronisation
//!
//! Two separate primitives are involved:
//!
//! - the chunk list's structural lock, taken exclusively only when chunks are
//!   appended and shared when a chunk is looked up;
//! - the store's writer gate, held for the duration of a content write so that
//!   at most one writer copies into chunks at a time.
//!
//! Readers never take the writer gate. A reader racing a write to the same
//! element sees either the old or the new value of each chunk segment, never a
//! torn primitive.

use super::chunk::Chunk;
use super::chunk_list::GrowableChunkList;
use super::error::{ColumnError, ColumnResult};
use super::types::{chunks_for, ChunkId, DataType, Element, ElementPosition, RawSource};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Type-erased view of a column, as seen by the insert pipeline
pub trait ColumnStore: Send + Sync {
    /// Logical field type of this column
    fn data_type(&self) -> DataType;

    /// Logical elements per chunk
    fn chunk_capacity(&self) -> usize;

    /// Primitive values per logical element
    fn dimension(&self) -> usize;

    /// Allocate enough chunks to hold `element_count` elements
    fn grow_to_at_least(&self, element_count: usize);

    /// Copy `element_count` elements from a tagged source buffer
    fn write_raw(
        &self,
        element_offset: usize,
        source: RawSource<'_>,
        element_count: usize,
    ) -> ColumnResult<()>;

    fn num_chunks(&self) -> usize;

    fn stats(&self) -> ColumnStats;
}

/// Chunked storage for elements of one primitive type
pub struct TypedColumnStore<T: Element> {
    chunks: GrowableChunkList<T>,
    chunk_capacity: usize,
    dimension: usize,

    /// Held across a whole partitioned write; enforces one writer at a time
    write_gate: Mutex<()>,
}

impl<T: Element> TypedColumnStore<T> {
    /// Create an empty store; no chunk is allocated until the first growth
    pub fn new(dimension: usize, chunk_capacity: usize) -> ColumnResult<Self> {
        if chunk_capacity == 0 {
            return Err(ColumnError::InvalidChunkCapacity {
                capacity: chunk_capacity,
            });
        }
        if dimension == 0 {
            return Err(ColumnError::ZeroDimension {
                primitive: T::PRIMITIVE,
            });
        }
        Ok(Self {
            chunks: GrowableChunkList::new(),
            chunk_capacity,
            dimension,
            write_gate: Mutex::new(()),
        })
    }

    pub fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Allocate enough chunks to hold `element_count` elements
    pub fn grow_to_at_least(&self, element_count: usize) {
        let chunk_count = chunks_for(element_count, self.chunk_capacity);
        self.chunks
            .ensure_at_least(chunk_count, self.dimension, self.chunk_capacity);
    }

    /// Write `element_count` elements from `source` starting at `element_offset`
    ///
    /// `source` holds `element_count * dimension` values laid out element by
    /// element. Missing chunks are allocated first; the copy is then split
    /// into a leading partial chunk, any number of fully covered chunks and a
    /// trailing partial chunk.
    ///
    /// # Panics
    ///
    /// Panics if `source` holds fewer than `element_count * dimension` values.
    pub fn write(&self, element_offset: usize, source: &[T], element_count: usize) {
        if element_count == 0 {
            return;
        }
        let needed = element_count * self.dimension;
        assert!(
            source.len() >= needed,
            "source holds {} values, write of {} elements needs {}",
            source.len(),
            element_count,
            needed
        );

        let _writer = self.write_gate.lock();
        self.grow_to_at_least(element_offset + element_count);

        let ElementPosition {
            mut chunk_id,
            chunk_offset,
        } = ElementPosition::locate(element_offset, self.chunk_capacity);

        tracing::trace!(
            element_offset,
            element_count,
            first_chunk = chunk_id,
            "partitioned write"
        );

        // Whole write lands in the first chunk
        if chunk_offset + element_count <= self.chunk_capacity {
            self.fill_chunk(chunk_id, chunk_offset, element_count, source, 0);
            return;
        }

        let first_size = self.chunk_capacity - chunk_offset;
        self.fill_chunk(chunk_id, chunk_offset, first_size, source, 0);
        let mut source_offset = first_size;
        let mut remaining = element_count - first_size;
        chunk_id += 1;

        while remaining >= self.chunk_capacity {
            self.fill_chunk(chunk_id, 0, self.chunk_capacity, source, source_offset);
            source_offset += self.chunk_capacity;
            remaining -= self.chunk_capacity;
            chunk_id += 1;
        }

        if remaining > 0 {
            self.fill_chunk(chunk_id, 0, remaining, source, source_offset);
        }
    }

    /// Type-checked write from a tagged source
    pub fn write_raw(
        &self,
        element_offset: usize,
        source: RawSource<'_>,
        element_count: usize,
    ) -> ColumnResult<()> {
        let Some(values) = T::downcast(source) else {
            tracing::warn!(
                expected = ?T::PRIMITIVE,
                actual = ?source.primitive(),
                "rejected type-erased write"
            );
            return Err(ColumnError::TypeMismatch {
                expected: T::PRIMITIVE,
                actual: source.primitive(),
            });
        };
        // An overflowing request can never be satisfied by a real buffer
        let needed = element_offset
            .checked_add(element_count)
            .and_then(|_| element_count.checked_mul(self.dimension))
            .unwrap_or(usize::MAX);
        if values.len() < needed {
            tracing::warn!(
                element_offset,
                element_count,
                got = values.len(),
                "rejected short type-erased write"
            );
            return Err(ColumnError::SourceLength {
                expected: needed,
                actual: values.len(),
            });
        }
        self.write(element_offset, values, element_count);
        Ok(())
    }

    /// Chunk `chunk_index` for bulk consumption
    ///
    /// The handle stays valid for as long as it is held; the tail chunk may
    /// still be receiving appends. Holding a [`Chunk::read`] guard delays
    /// appends into that chunk until the guard is dropped, but never blocks
    /// other readers.
    ///
    /// # Panics
    ///
    /// Panics if the chunk has not been allocated.
    pub fn read_chunk(&self, chunk_index: ChunkId) -> Arc<Chunk<T>> {
        self.chunks.at(chunk_index)
    }

    /// Chunk `chunk_index`, or `None` if it has not been allocated
    pub fn try_read_chunk(&self, chunk_index: ChunkId) -> Option<Arc<Chunk<T>>> {
        self.chunks.get(chunk_index)
    }

    /// Handles to every allocated chunk, in order
    pub fn chunks(&self) -> Vec<Arc<Chunk<T>>> {
        self.chunks.snapshot()
    }

    /// Run `f` over the components of element `element_index` without copying
    ///
    /// # Panics
    ///
    /// Panics if the element's chunk has not been allocated.
    pub fn with_element<R>(&self, element_index: usize, f: impl FnOnce(&[T]) -> R) -> R {
        let pos = ElementPosition::locate(element_index, self.chunk_capacity);
        let chunk = self.read_chunk(pos.chunk_id);
        let data = chunk.read();
        f(data.element(pos.chunk_offset, self.dimension))
    }

    /// Copy of the `dimension` components of element `element_index`
    ///
    /// # Panics
    ///
    /// Panics if the element's chunk has not been allocated.
    pub fn read_element(&self, element_index: usize) -> Vec<T> {
        self.with_element(element_index, <[T]>::to_vec)
    }

    /// Scalar element at `element_index`
    ///
    /// # Panics
    ///
    /// Panics if this store is not scalar (`dimension != 1`) or the element's
    /// chunk has not been allocated.
    pub fn get(&self, element_index: usize) -> T {
        assert!(
            self.dimension == 1,
            "scalar accessor used on a store with dimension {}",
            self.dimension
        );
        self.with_element(element_index, |values| values[0])
    }

    /// Copy elements `[element_offset, element_offset + element_count)` out
    ///
    /// Mirrors the partitioned write: one slice per chunk touched.
    ///
    /// # Panics
    ///
    /// Panics if any chunk in the range has not been allocated.
    pub fn read_range(&self, element_offset: usize, element_count: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(element_count * self.dimension);
        let mut index = element_offset;
        let end = element_offset + element_count;

        while index < end {
            let pos = ElementPosition::locate(index, self.chunk_capacity);
            let take = pos.remaining_in_chunk(self.chunk_capacity).min(end - index);
            let chunk = self.read_chunk(pos.chunk_id);
            let data = chunk.read();
            let start = pos.chunk_offset * self.dimension;
            out.extend_from_slice(&data[start..start + take * self.dimension]);
            index += take;
        }
        out
    }

    pub fn stats(&self) -> ColumnStats {
        let num_chunks = self.num_chunks();
        let allocated_elements = num_chunks * self.chunk_capacity;
        ColumnStats {
            num_chunks,
            chunk_capacity: self.chunk_capacity,
            dimension: self.dimension,
            allocated_elements,
            allocated_bytes: allocated_elements * self.dimension * T::PRIMITIVE.size_of(),
        }
    }

    fn fill_chunk(
        &self,
        chunk_id: ChunkId,
        chunk_offset: usize,
        element_count: usize,
        source: &[T],
        source_offset: usize,
    ) {
        if element_count == 0 {
            return;
        }
        let chunk = self.chunks.at(chunk_id);
        chunk.fill(
            chunk_offset,
            element_count,
            &source[source_offset * self.dimension..],
        );
    }
}

impl<T: Element> fmt::Debug for TypedColumnStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedColumnStore")
            .field("primitive", &T::PRIMITIVE)
            .field("dimension", &self.dimension)
            .field("chunk_capacity", &self.chunk_capacity)
            .field("num_chunks", &self.num_chunks())
            .finish()
    }
}

/// Allocation statistics for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnStats {
    pub num_chunks: usize,
    pub chunk_capacity: usize,
    pub dimension: usize,
    /// Element slots across all allocated chunks
    pub allocated_elements: usize,
    pub allocated_bytes: usize,
}
