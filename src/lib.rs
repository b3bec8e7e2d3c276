//! # segcore-column
//!
//! Chunked, append-only, thread-safe column storage used by the insert path of
//! a growing vector database segment.

pub mod column;
pub use column::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_loads() {
        // Verify core types are accessible
        let column = ScalarColumn::<i64>::new(DEFAULT_CHUNK_CAPACITY).unwrap();
        assert_eq!(column.num_chunks(), 0);
    }
}
