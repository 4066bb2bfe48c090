//! Buffer Pool Manager Tests
//!
//! Scenario tests against the public API, using the instrumented
//! in-memory backend to count block reads and writes.

use framepool::buffer::{BufferPoolManager, Eviction, FetchOutcome};
use framepool::common::{BlockId, FrameId, PoolConfig};
use framepool::storage::MemoryBackend;

fn create_bpm(
    frames: usize,
    page_size: usize,
    blocks: u32,
) -> (BufferPoolManager<MemoryBackend>, MemoryBackend) {
    let config = PoolConfig::new(frames, page_size, blocks).unwrap();
    let store = MemoryBackend::for_config(&config);
    (BufferPoolManager::new(config, store.clone()).unwrap(), store)
}

fn block(i: u32) -> BlockId {
    BlockId::new(i)
}

fn frame(i: usize) -> FrameId {
    FrameId::new(i)
}

/// No two frames may hold the same block, and only occupied frames may be
/// dirty.
fn assert_invariants(bpm: &BufferPoolManager<MemoryBackend>) {
    let states = bpm.describe_frames();
    let mut seen = Vec::new();
    for state in &states {
        if let Some(b) = state.block {
            assert!(!seen.contains(&b), "{} held by two frames", b);
            seen.push(b);
        } else {
            assert!(!state.dirty, "{} is dirty but empty", state.frame);
        }
    }
}

// ============================================================================
// Walkthrough: 3 frames, 4-byte pages, 5 blocks
// ============================================================================

#[test]
fn test_walkthrough() {
    let (mut bpm, store) = create_bpm(3, 4, 5);

    // fetch(2) misses and lands in frame 0
    assert_eq!(bpm.fetch(block(2)).unwrap(), FetchOutcome::Loaded(frame(0)));
    let state = bpm.frame_state(frame(0)).unwrap();
    assert_eq!(state.block, Some(block(2)));
    assert!(!state.dirty);
    assert_invariants(&bpm);

    // write "WXYZ" into frame 0
    bpm.write_to_frame(frame(0), b"WXYZ").unwrap();
    let state = bpm.frame_state(frame(0)).unwrap();
    assert!(state.dirty);
    assert_eq!(state.data, b"WXYZ");
    assert_invariants(&bpm);

    // fill the remaining frames
    assert_eq!(bpm.fetch(block(3)).unwrap(), FetchOutcome::Loaded(frame(1)));
    assert_eq!(bpm.fetch(block(4)).unwrap(), FetchOutcome::Loaded(frame(2)));
    assert_eq!(bpm.free_frame_count(), 0);

    // fetch(1) needs a victim; nominate frame 0
    assert_eq!(bpm.fetch(block(1)).unwrap(), FetchOutcome::NeedsVictim);
    assert_eq!(store.writes(), 0);

    let outcome = bpm.fetch_evicting(block(1), frame(0)).unwrap();
    assert_eq!(
        outcome,
        FetchOutcome::Replaced {
            frame: frame(0),
            evicted: Eviction::WrittenBack(block(2)),
        }
    );
    assert_eq!(store.writes_to(block(2)), 1);
    assert_eq!(store.writes(), 1);
    assert_eq!(store.block(block(2)), b"WXYZ");

    let state = bpm.frame_state(frame(0)).unwrap();
    assert_eq!(state.block, Some(block(1)));
    assert!(!state.dirty);
    assert_invariants(&bpm);

    // nothing left dirty: power-off only closes
    let report = bpm.power_off().unwrap();
    assert!(report.written_back.is_empty());
    assert_eq!(store.writes(), 1);
    assert!(store.is_closed());
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_round_trip_through_eviction() {
    let (mut bpm, _store) = create_bpm(2, 8, 10);

    let f = bpm.fetch(block(7)).unwrap().frame().unwrap();
    bpm.write_to_frame(f, b"payload!").unwrap();
    assert_eq!(bpm.evict(f).unwrap(), Eviction::WrittenBack(block(7)));

    // Occupy frame 0 so block 7 comes back elsewhere.
    bpm.fetch(block(0)).unwrap();
    let f = bpm.fetch(block(7)).unwrap().frame().unwrap();
    assert_eq!(f, frame(1));
    assert_eq!(bpm.frame_data(f).unwrap(), b"payload!");
}

#[test]
fn test_cache_hit_idempotence() {
    let (mut bpm, store) = create_bpm(3, 4, 5);

    let first = bpm.fetch(block(3)).unwrap();
    let reads = store.reads();
    let second = bpm.fetch(block(3)).unwrap();

    assert_eq!(first.frame(), second.frame());
    assert!(second.is_hit());
    assert_eq!(store.reads(), reads);
}

#[test]
fn test_clean_eviction_is_io_free() {
    let (mut bpm, store) = create_bpm(3, 4, 5);

    for b in 0..3 {
        bpm.fetch(block(b)).unwrap();
    }
    for f in 0..3 {
        assert!(matches!(bpm.evict(frame(f)).unwrap(), Eviction::Clean(_)));
    }

    assert_eq!(store.writes(), 0);
    assert_eq!(bpm.free_frame_count(), 3);
    assert_eq!(bpm.stats().evictions, 3);
}

#[test]
fn test_shutdown_flush_completeness() {
    let (mut bpm, store) = create_bpm(4, 4, 8);

    let payloads: [(u32, &[u8; 4]); 3] = [(1, b"one!"), (5, b"five"), (6, b"six!")];
    for (b, payload) in payloads {
        let f = bpm.fetch(block(b)).unwrap().frame().unwrap();
        bpm.write_to_frame(f, b"temp").unwrap();
        bpm.write_to_frame(f, payload).unwrap();
    }
    // One clean resident block, not written.
    bpm.fetch(block(2)).unwrap();

    let report = bpm.power_off().unwrap();

    assert_eq!(report.written_back, vec![block(1), block(5), block(6)]);
    for (b, payload) in payloads {
        assert_eq!(store.block(block(b)), payload);
        assert_eq!(store.writes_to(block(b)), 1);
    }
    assert_eq!(store.writes_to(block(2)), 0);
}

#[test]
fn test_rejected_write_leaves_state_untouched() {
    let (mut bpm, store) = create_bpm(3, 4, 5);
    bpm.fetch(block(0)).unwrap();
    bpm.write_to_frame(frame(0), b"good").unwrap();
    let before = bpm.describe_frames();

    assert!(bpm.write_to_frame(frame(0), b"").is_err());
    assert!(bpm.write_to_frame(frame(0), b"bad").is_err());
    assert!(bpm.write_to_frame(frame(0), b"toolong").is_err());
    assert!(bpm.write_to_frame(frame(1), b"nope").is_err());

    assert_eq!(bpm.describe_frames(), before);
    assert_eq!(store.writes(), 0);
}

#[test]
fn test_invalid_arguments_are_not_fatal() {
    let (mut bpm, _store) = create_bpm(3, 4, 5);
    bpm.fetch(block(1)).unwrap();

    let errors = [
        bpm.fetch(block(99)).unwrap_err(),
        bpm.fetch_evicting(block(2), frame(3)).unwrap_err(),
        bpm.evict(frame(10)).unwrap_err(),
        bpm.write_to_frame(frame(2), b"WXYZ").unwrap_err(),
    ];

    for err in &errors {
        assert!(!err.is_fatal(), "{} should be recoverable", err);
    }

    // Pool still works.
    assert!(bpm.fetch(block(1)).unwrap().is_hit());
    assert_invariants(&bpm);
}

#[test]
fn test_victim_choice_is_respected() {
    let (mut bpm, store) = create_bpm(3, 4, 5);
    for b in 0..3 {
        bpm.fetch(block(b)).unwrap();
    }
    bpm.write_to_frame(frame(1), b"keep").unwrap();

    // Evict the clean frame 2 instead of the dirty one.
    let outcome = bpm.fetch_with(block(4), |_| frame(2)).unwrap();

    assert_eq!(
        outcome,
        FetchOutcome::Replaced {
            frame: frame(2),
            evicted: Eviction::Clean(block(2)),
        }
    );
    assert_eq!(store.writes(), 0);
    assert!(bpm.frame_state(frame(1)).unwrap().dirty);
}

#[test]
fn test_refetch_after_dirty_eviction_reads_new_bytes() {
    let (mut bpm, store) = create_bpm(1, 4, 5);

    bpm.fetch(block(0)).unwrap();
    bpm.write_to_frame(frame(0), b"zero").unwrap();

    let outcome = bpm.fetch_evicting(block(1), frame(0)).unwrap();
    assert_eq!(outcome.frame(), Some(frame(0)));

    let outcome = bpm.fetch_evicting(block(0), frame(0)).unwrap();
    assert_eq!(
        outcome,
        FetchOutcome::Replaced {
            frame: frame(0),
            evicted: Eviction::Clean(block(1)),
        }
    );
    assert_eq!(bpm.frame_data(frame(0)).unwrap(), b"zero");
    assert_eq!(store.reads(), 3);
    assert_eq!(store.writes(), 1);
}

#[test]
fn test_stats_accuracy() {
    let (mut bpm, _store) = create_bpm(2, 4, 5);

    bpm.fetch(block(0)).unwrap();
    for _ in 0..5 {
        bpm.fetch(block(0)).unwrap();
    }
    bpm.fetch(block(1)).unwrap();
    bpm.write_to_frame(frame(1), b"dirt").unwrap();
    bpm.fetch_evicting(block(2), frame(1)).unwrap();

    let stats = bpm.stats();
    assert_eq!(stats.cache_hits, 5);
    assert_eq!(stats.cache_misses, 3);
    assert_eq!(stats.blocks_read, 3);
    assert_eq!(stats.blocks_written, 1);
    assert_eq!(stats.evictions, 1);
}
