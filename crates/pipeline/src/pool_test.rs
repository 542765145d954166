//! Tests for ArenaPool

use logship_protocol::{ColumnTag, StreamIdentity};

use super::*;

fn identity(log_type: &str) -> StreamIdentity {
    StreamIdentity::builder(log_type)
        .typed_column("v", &[ColumnTag::String])
        .build()
        .unwrap()
}

#[test]
fn test_acquire_allocates_when_empty() {
    let pool = ArenaPool::new();
    let arena = pool.acquire(identity("a"), 128).unwrap();

    assert_eq!(arena.capacity(), 128);
    assert_eq!(arena.identity().log_type(), "a");
    assert_eq!(pool.metrics().misses, 1);
    assert_eq!(pool.metrics().hits, 0);
}

#[test]
fn test_release_then_acquire_reuses() {
    let pool = ArenaPool::new();
    let mut arena = pool.acquire(identity("a"), 128).unwrap();
    arena.put(b"row").unwrap();
    arena.close(42).unwrap();

    pool.release(arena);
    assert_eq!(pool.idle(128), 1);

    let arena = pool.acquire(identity("b"), 128).unwrap();
    assert_eq!(arena.identity().log_type(), "b");
    assert!(arena.is_empty());
    assert!(!arena.is_closed());
    assert_eq!(pool.idle(128), 0);

    let metrics = pool.metrics();
    assert_eq!(metrics.hits, 1);
    assert_eq!(metrics.misses, 1);
    assert_eq!(metrics.returns, 1);
}

#[test]
fn test_free_lists_keyed_by_capacity() {
    let pool = ArenaPool::new();
    let small = pool.acquire(identity("a"), 64).unwrap();
    let large = pool.acquire(identity("a"), 256).unwrap();
    pool.release(small);
    pool.release(large);

    assert_eq!(pool.idle(64), 1);
    assert_eq!(pool.idle(256), 1);
    assert_eq!(pool.idle_total(), 2);

    // A different size never takes a pooled arena
    let other = pool.acquire(identity("a"), 128).unwrap();
    assert_eq!(other.capacity(), 128);
    assert_eq!(pool.idle_total(), 2);
}

#[test]
fn test_acquire_header_too_large() {
    let pool = ArenaPool::new();
    let err = pool.acquire(identity("a"), 8).unwrap_err();
    assert!(err.is_fatal_config());
}
