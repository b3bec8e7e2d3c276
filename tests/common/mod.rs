//! Common test utilities: logging setup and deterministic row generators

#![allow(dead_code)] // Utility functions may not be used by all tests

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test subscriber once per test binary
///
/// Set `RUST_LOG=segcore_column=trace` to see growth and write events.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// `count` scalar rows whose value encodes their row index
pub fn scalar_rows(first_row: usize, count: usize) -> Vec<i64> {
    (first_row..first_row + count).map(|r| r as i64 * 10).collect()
}

/// `count` float vectors of width `dim`; component `c` of row `r` is `r * 1000 + c`
pub fn float_rows(first_row: usize, count: usize, dim: usize) -> Vec<f32> {
    (first_row..first_row + count)
        .flat_map(|r| (0..dim).map(move |c| (r * 1000 + c) as f32))
        .collect()
}

/// `count` packed binary vectors of `bytes` bytes each
pub fn binary_rows(first_row: usize, count: usize, bytes: usize) -> Vec<u8> {
    (first_row..first_row + count)
        .flat_map(|r| (0..bytes).map(move |b| (r.wrapping_mul(31) ^ b) as u8))
        .collect()
}
