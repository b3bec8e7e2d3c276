//! Append-only chunk list with lock-free size checks
//!
//! Growth is rare and reads are constant, so the list keeps its length in an
//! atomic that callers can probe without locking. Appending takes the
//! structural lock exclusively; looking up an existing chunk takes it shared,
//! which serialises only against growth.
//!
//! ## Concurrency Model
//!
//! ```text
//! Reader ──→ len() (atomic) ──→ RwLock::read() ──→ clone Arc<Chunk> ──→ release
//!
//! Grower ──→ len() >= n ? ──yes──→ return
//!                 │ no
//!                 ↓
//!            RwLock::write() ──→ push chunk, publish len ──→ ... until n
//! ```
//!
//! Chunks are held by `Arc`, so a handle returned by [`GrowableChunkList::at`]
//! stays valid even when the backing `Vec` reallocates on a later append.

use super::chunk::Chunk;
use super::types::{ChunkId, Element};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Ordered, grow-only sequence of chunks
pub struct GrowableChunkList<T: Element> {
    chunks: RwLock<Vec<Arc<Chunk<T>>>>,

    /// Published chunk count; only ever increases
    size: AtomicUsize,
}

impl<T: Element> GrowableChunkList<T> {
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
            size: AtomicUsize::new(0),
        }
    }

    /// Number of chunks present (lock-free, monotonically non-decreasing)
    pub fn len(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make sure at least `count` chunks exist
    ///
    /// New chunks are allocated with `dimension * capacity` values. Returns
    /// the number of chunks this call appended; concurrent callers asking for
    /// overlapping counts serialise and only one of them appends each chunk.
    pub fn ensure_at_least(&self, count: usize, dimension: usize, capacity: usize) -> usize {
        if count <= self.len() {
            return 0;
        }

        let mut chunks = self.chunks.write();
        let before = chunks.len();
        while chunks.len() < count {
            chunks.push(Arc::new(Chunk::new(dimension, capacity)));
            self.size.store(chunks.len(), Ordering::Release);
        }
        let appended = chunks.len() - before;
        if appended > 0 {
            tracing::debug!(
                from = before,
                to = chunks.len(),
                primitive = ?T::PRIMITIVE,
                "grew chunk list"
            );
        }
        appended
    }

    /// Chunk `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below the current [`len`](Self::len).
    pub fn at(&self, index: ChunkId) -> Arc<Chunk<T>> {
        let size = self.len();
        assert!(
            index < size,
            "chunk index {} out of range (num chunks: {})",
            index,
            size
        );
        Arc::clone(&self.chunks.read()[index])
    }

    /// Chunk `index`, or `None` if it has not been allocated yet
    pub fn get(&self, index: ChunkId) -> Option<Arc<Chunk<T>>> {
        if index >= self.len() {
            return None;
        }
        self.chunks.read().get(index).cloned()
    }

    /// Handles to every chunk present at the time of the call
    pub fn snapshot(&self) -> Vec<Arc<Chunk<T>>> {
        self.chunks.read().clone()
    }
}

impl<T: Element> Default for GrowableChunkList<T> {
    fn default() -> Self {
        Self::new()
    }
}
