//! # Chunked Concurrent Columns
//!
//! Append-only column storage for the write path of a growing segment. Each
//! field of the segment gets one column; rows arrive in batches and are copied
//! into fixed-size chunks, while queries and index builders read chunks that
//! are already there.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  FieldColumns / FieldColumn  (one column per schema field)  │
//! └─────────────────────────────────────────────────────────────┘
//!                          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ConcurrentColumn<L>   L = Scalar<T> | FloatVector |        │
//! │                            BinaryVector                     │
//! │  - derives storage dimension from configured width          │
//! └─────────────────────────────────────────────────────────────┘
//!                          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  TypedColumnStore<T>                                        │
//! │  - element index → (chunk id, chunk offset)                 │
//! │  - partitioned writes across chunk boundaries               │
//! │  - writer gate (one content writer at a time)               │
//! └─────────────────────────────────────────────────────────────┘
//!                          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  GrowableChunkList<T>                                       │
//! │  - atomic length, RwLock for structure                      │
//! │  - Arc<Chunk<T>>, never relocated or removed                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use segcore_column::{ColumnStore, FloatVectorColumn, ScalarColumn};
//!
//! let ids = ScalarColumn::<i64>::new(4).unwrap();
//! ids.write(0, &[10, 11, 12, 13, 14, 15, 16, 17, 18, 19], 10);
//! assert_eq!(ids.num_chunks(), 3);
//! assert_eq!(ids.get(9), 19);
//!
//! let embeddings = FloatVectorColumn::new(2, 4).unwrap();
//! embeddings.write(3, &[0.5, 1.5, 2.5, 3.5], 2);
//! assert_eq!(embeddings.read_element(4), vec![2.5, 3.5]);
//! ```

pub mod chunk;
pub mod chunk_list;
pub mod config;
pub mod error;
pub mod field;
pub mod store;
pub mod types;
pub mod variants;

pub use chunk::{Chunk, ChunkGuard};
pub use chunk_list::GrowableChunkList;
pub use config::{ColumnConfig, FieldSpec, DEFAULT_CHUNK_CAPACITY};
pub use error::{ColumnError, ColumnResult};
pub use field::{FieldColumn, FieldColumns};
pub use store::{ColumnStats, ColumnStore, TypedColumnStore};
pub use types::{
    ChunkId, DataType, Element, ElementPosition, PrimitiveType, RawSource, ScalarElement,
};
pub use variants::{
    BinaryVector, BinaryVectorColumn, ConcurrentColumn, ElementLayout, FloatVector,
    FloatVectorColumn, Scalar, ScalarColumn,
};
