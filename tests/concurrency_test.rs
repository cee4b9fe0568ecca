//! Single-producer/single-consumer stress tests for the sample ring.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use smoothvolt::sampling::SampleRing;

/// Values pushed are `BASE + i`, so any value the reader observes must be
/// either zero (an unwritten slot) or something the writer actually pushed.
/// Anything else would be a torn or invented read.
const BASE: i32 = 1_000_000;

#[test]
fn test_concurrent_reads_only_see_pushed_values() {
    let ring = Arc::new(SampleRing::new(64));
    let done = Arc::new(AtomicBool::new(false));
    let total_pushes: i32 = 200_000;

    let writer = {
        let ring = ring.clone();
        let done = done.clone();
        thread::spawn(move || {
            for i in 0..total_pushes {
                ring.push(BASE + i);
            }
            done.store(true, Ordering::Release);
        })
    };

    let reader = {
        let ring = ring.clone();
        let done = done.clone();
        thread::spawn(move || {
            let mut reads = 0u64;
            while !done.load(Ordering::Acquire) {
                for value in ring.read_recent(48) {
                    assert!(
                        value == 0 || (BASE..BASE + total_pushes).contains(&value),
                        "read value {} was never pushed",
                        value
                    );
                }
                reads += 1;
            }
            reads
        })
    };

    writer.join().unwrap();
    let reads = reader.join().unwrap();
    assert!(reads > 0, "reader never overlapped the writer");
}

#[test]
fn test_reader_observes_monotonic_progress() {
    // The most recent value only ever moves forward: pushes are observed
    // in the order they were published.
    let ring = Arc::new(SampleRing::new(64));
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let ring = ring.clone();
        let done = done.clone();
        thread::spawn(move || {
            for i in 0..100_000 {
                ring.push(BASE + i);
            }
            done.store(true, Ordering::Release);
        })
    };

    let reader = {
        let ring = ring.clone();
        let done = done.clone();
        thread::spawn(move || {
            let mut last_seen = 0;
            while !done.load(Ordering::Acquire) {
                if let Some(&newest) = ring.read_recent(1).last() {
                    assert!(
                        newest >= last_seen,
                        "newest value went backwards: {} after {}",
                        newest,
                        last_seen
                    );
                    last_seen = newest;
                }
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
}

#[test]
fn test_full_lap_leaves_exact_window() {
    let ring = SampleRing::new(256);
    for i in 0..1000 {
        ring.push(BASE + i);
    }
    // Quiescent after the writer stops: the last 256 pushes, in order
    let window = ring.read_recent(256);
    let expected: Vec<i32> = (1000 - 256..1000).map(|i| BASE + i).collect();
    assert_eq!(window, expected);
}
