//! Concurrent stress tests for chunked columns
//!
//! Tests concurrent growth, reads racing appends, and writers serialised by
//! the store's writer gate.

mod common;

use common::{float_rows, init_tracing, scalar_rows};
use segcore_column::{ColumnStore, FloatVectorColumn, GrowableChunkList, ScalarColumn};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_growth_converges_to_max() {
    init_tracing();
    let column = Arc::new(ScalarColumn::<i64>::new(16).unwrap());
    let mut handles = vec![];

    // Overlapping and repeated targets; the largest is 1000 elements
    for i in 0..16 {
        let column_clone = Arc::clone(&column);
        let handle = thread::spawn(move || {
            for round in 0..50 {
                let target = ((i * 37 + round * 11) % 1000) + 1;
                column_clone.grow_to_at_least(target);
            }
            column_clone.grow_to_at_least(1000 - i);
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(column.num_chunks(), 1000usize.div_ceil(16));
}

#[test]
fn test_concurrent_growth_no_duplicate_chunks() {
    let list: Arc<GrowableChunkList<f32>> = Arc::new(GrowableChunkList::new());
    let mut handles = vec![];

    for i in 0..12 {
        let list_clone = Arc::clone(&list);
        let handle = thread::spawn(move || {
            for n in 1..=40 {
                list_clone.ensure_at_least(n + i % 3, 4, 8);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(list.len(), 42);
    let chunks = list.snapshot();
    assert_eq!(chunks.len(), 42);
    let distinct: HashSet<*const _> = chunks.iter().map(Arc::as_ptr).collect();
    assert_eq!(distinct.len(), 42);
}

#[test]
fn test_readers_during_growth() {
    init_tracing();
    let column = Arc::new(ScalarColumn::<i64>::new(8).unwrap());
    let committed = Arc::new(AtomicUsize::new(0));
    let done = Arc::new(AtomicBool::new(false));
    let total = 4000;

    let writer = {
        let column = Arc::clone(&column);
        let committed = Arc::clone(&committed);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut written = 0;
            while written < total {
                let batch = (written % 13 + 1).min(total - written);
                column.write(written, &scalar_rows(written, batch), batch);
                written += batch;
                committed.store(written, Ordering::Release);
            }
            done.store(true, Ordering::Release);
        })
    };

    let mut readers = vec![];
    for _ in 0..6 {
        let column = Arc::clone(&column);
        let committed = Arc::clone(&committed);
        let done = Arc::clone(&done);
        readers.push(thread::spawn(move || {
            let mut checks = 0;
            while !done.load(Ordering::Acquire) || checks == 0 {
                // Every chunk already counted must be readable
                let num_chunks = column.num_chunks();
                for chunk_id in 0..num_chunks {
                    assert_eq!(column.read_chunk(chunk_id).capacity(), 8);
                }

                // Every row published so far must read back intact
                let upto = committed.load(Ordering::Acquire);
                if upto > 0 {
                    let tail = upto.saturating_sub(64);
                    assert_eq!(
                        column.read_range(tail, upto - tail),
                        scalar_rows(tail, upto - tail)
                    );
                    assert_eq!(column.get(upto - 1), (upto as i64 - 1) * 10);
                }
                checks += 1;
            }
        }));
    }

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(column.num_chunks(), total / 8);
    assert_eq!(column.read_range(0, total), scalar_rows(0, total));
}

#[test]
fn test_concurrent_writers_disjoint_blocks() {
    let column = Arc::new(FloatVectorColumn::new(4, 7).unwrap());
    let block = 100;
    let mut handles = vec![];

    // Writers serialise on the writer gate; each block straddles several chunks
    for i in 0..8 {
        let column_clone = Arc::clone(&column);
        let handle = thread::spawn(move || {
            let offset = i * block;
            column_clone.write(offset, &float_rows(offset, block, 4), block);
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(column.num_chunks(), (8 * block).div_ceil(7));
    assert_eq!(column.read_range(0, 8 * block), float_rows(0, 8 * block, 4));
}

#[test]
fn test_shared_dyn_store_growth() {
    let store: Arc<dyn ColumnStore> = Arc::new(FloatVectorColumn::new(16, 32).unwrap());
    let mut handles = vec![];

    for i in 0..10 {
        let store_clone = Arc::clone(&store);
        let handle = thread::spawn(move || {
            store_clone.grow_to_at_least((i + 1) * 100);
            store_clone.num_chunks()
        });
        handles.push(handle);
    }

    // Each thread observes at least the chunks it asked for
    for (i, handle) in handles.into_iter().enumerate() {
        let seen = handle.join().unwrap();
        assert!(seen >= ((i + 1) * 100).div_ceil(32));
    }

    let stats = store.stats();
    assert_eq!(stats.num_chunks, 1000usize.div_ceil(32));
    assert_eq!(stats.allocated_bytes, stats.num_chunks * 32 * 16 * 4);
}

#[test]
fn test_held_chunk_guard_does_not_block_readers() {
    init_tracing();
    let column = Arc::new(ScalarColumn::<i64>::new(8).unwrap());
    column.write(0, &[1, 2], 2);

    let chunk = column.read_chunk(0);
    let guard = chunk.read();

    // Append into the guarded chunk; queues on the chunk's content lock
    let writer = {
        let column = Arc::clone(&column);
        thread::spawn(move || column.write(2, &[3], 1))
    };
    thread::sleep(Duration::from_millis(100));

    let (tx, rx) = mpsc::channel();
    let reader = {
        let column = Arc::clone(&column);
        thread::spawn(move || tx.send((column.get(0), column.get(1))).unwrap())
    };
    let seen = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("reader stalled behind a queued append");
    assert_eq!(seen, (1, 2));
    assert_eq!(&guard[..3], &[1, 2, 0]);

    drop(guard);
    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(column.read_range(0, 3), vec![1, 2, 3]);
}
