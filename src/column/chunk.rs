//! Fixed-capacity chunk of column data
//!
//! A chunk is one contiguous block of `dimension * capacity` primitive values.
//! Its length never changes after allocation. Content is guarded by a lock of
//! its own so that appends into the tail chunk and reads of already-written
//! elements never touch the chunk list's structural lock.

use super::types::Element;
use parking_lot::{RwLock, RwLockReadGuard};
use std::fmt;
use std::ops::Deref;

/// A fixed-size block of elements
pub struct Chunk<T: Element> {
    /// Flat component storage, `capacity * dimension` long
    data: RwLock<Box<[T]>>,

    /// Logical elements this chunk can hold
    capacity: usize,

    /// Components per logical element
    dimension: usize,
}

impl<T: Element> Chunk<T> {
    /// Allocate a zero-filled chunk
    pub fn new(dimension: usize, capacity: usize) -> Self {
        Self {
            data: RwLock::new(vec![T::default(); dimension * capacity].into_boxed_slice()),
            capacity,
            dimension,
        }
    }

    /// Logical elements this chunk can hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of primitive values backing this chunk
    pub fn len(&self) -> usize {
        self.capacity * self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shared view of the whole chunk for bulk consumption
    ///
    /// Values past the column's written length are still `T::default()`.
    /// Readers never queue behind a pending `fill`, so other reads of this
    /// chunk proceed while the guard is held; the pending append waits until
    /// every guard on the chunk is dropped.
    pub fn read(&self) -> ChunkGuard<'_, T> {
        ChunkGuard {
            guard: self.data.read_recursive(),
        }
    }

    /// Copy the whole chunk out
    pub fn to_vec(&self) -> Vec<T> {
        self.data.read_recursive().to_vec()
    }

    /// Overwrite `element_count` elements starting at `element_offset`
    ///
    /// Only the owning store's write path calls this, while holding its
    /// writer gate.
    pub(crate) fn fill(&self, element_offset: usize, element_count: usize, source: &[T]) {
        if element_count == 0 {
            return;
        }
        assert!(
            element_offset + element_count <= self.capacity,
            "chunk fill out of range: offset {} + count {} > capacity {}",
            element_offset,
            element_count,
            self.capacity
        );
        let start = element_offset * self.dimension;
        let len = element_count * self.dimension;
        let mut data = self.data.write();
        data[start..start + len].copy_from_slice(&source[..len]);
    }
}

impl<T: Element> fmt::Debug for Chunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("primitive", &T::PRIMITIVE)
            .field("capacity", &self.capacity)
            .field("dimension", &self.dimension)
            .finish()
    }
}

/// Read guard over a chunk's values
pub struct ChunkGuard<'a, T: Element> {
    guard: RwLockReadGuard<'a, Box<[T]>>,
}

impl<T: Element> ChunkGuard<'_, T> {
    /// Components of the element at `element_offset` within this chunk
    pub fn element(&self, element_offset: usize, dimension: usize) -> &[T] {
        let start = element_offset * dimension;
        &self.guard[start..start + dimension]
    }
}

impl<T: Element> Deref for ChunkGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.guard
    }
}
