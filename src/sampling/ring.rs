use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use super::Reading;

/// Fixed-capacity ring of millivolt readings
///
/// Shared between exactly one writer (the sampler) and one reader (the
/// filter). The write cursor is published with release ordering and read
/// with acquire ordering, so a slot's contents are always visible to the
/// reader before the cursor advance that exposes them. No lock is taken on
/// either path; `push` never blocks and never allocates.
///
/// Slots are zero-initialized. Until the ring has wrapped once, positions
/// that have never been written read back as zero; [`SampleRing::valid_len`]
/// reports how many slots hold real samples so callers can detect the
/// warm-up window if they care.
pub struct SampleRing {
    slots: Box<[AtomicI32]>,
    write_cursor: AtomicUsize,
    written: AtomicUsize,
}

impl SampleRing {
    /// Create a ring with `capacity` zero-initialized slots
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be positive");
        let slots = (0..capacity).map(|_| AtomicI32::new(0)).collect();
        Self {
            slots,
            write_cursor: AtomicUsize::new(0),
            written: AtomicUsize::new(0),
        }
    }

    /// Store `value` at the write cursor and advance it, wrapping at
    /// capacity. Overwrites the oldest retained sample once the ring has
    /// wrapped. Writer side only.
    pub fn push(&self, value: Reading) {
        let capacity = self.slots.len();
        let cursor = self.write_cursor.load(Ordering::Relaxed);
        self.slots[cursor].store(value, Ordering::Relaxed);
        // The release store publishes the slot write above; the reader's
        // acquire load of the cursor pairs with it.
        self.write_cursor
            .store((cursor + 1) % capacity, Ordering::Release);

        let written = self.written.load(Ordering::Relaxed);
        if written < capacity {
            self.written.store(written + 1, Ordering::Relaxed);
        }
    }

    /// Return the `count` most recently written values in chronological
    /// order (oldest to newest), `count` clamped to capacity.
    ///
    /// The cursor is sampled exactly once, so the indices visited form a
    /// consistent window even while the writer keeps pushing. A push that
    /// lands mid-read may refresh slots inside that window with newer
    /// values, which is acceptable for a best-effort smoothing view.
    pub fn read_recent(&self, count: usize) -> Vec<Reading> {
        let capacity = self.slots.len();
        let count = count.min(capacity);
        let cursor = self.write_cursor.load(Ordering::Acquire);

        let mut values = Vec::with_capacity(count);
        for i in 0..count {
            let index = (cursor + capacity - count + i) % capacity;
            values.push(self.slots[index].load(Ordering::Relaxed));
        }
        values
    }

    /// Number of slots in the ring
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots that have been written at least once (saturates at
    /// capacity)
    pub fn valid_len(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }

    /// Current write cursor position
    #[allow(dead_code)]
    pub fn cursor(&self) -> usize {
        self.write_cursor.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_slots_read_zero() {
        let ring = SampleRing::new(8);
        ring.push(100);
        ring.push(200);

        // Window larger than what has been written: leading slots are zero
        assert_eq!(ring.read_recent(4), vec![0, 0, 100, 200]);
        assert_eq!(ring.valid_len(), 2);
    }

    #[test]
    fn test_cursor_returns_after_full_lap() {
        let ring = SampleRing::new(16);
        assert_eq!(ring.cursor(), 0);
        for v in 0..16 {
            ring.push(v);
        }
        assert_eq!(ring.cursor(), 0);
        assert_eq!(ring.valid_len(), 16);
    }

    #[test]
    fn test_read_recent_across_wrap() {
        let ring = SampleRing::new(4);
        for v in 1..=6 {
            ring.push(v * 10);
        }
        // Ring now holds [50, 60, 30, 40], cursor at 2
        assert_eq!(ring.read_recent(3), vec![40, 50, 60]);
        assert_eq!(ring.read_recent(4), vec![30, 40, 50, 60]);
    }

    #[test]
    fn test_push_overwrites_after_capacity_more_pushes() {
        let ring = SampleRing::new(4);
        ring.push(7);
        assert_eq!(ring.read_recent(1), vec![7]);

        // Three more pushes keep 7 retained; the fourth overwrites it
        for v in [8, 9, 10] {
            ring.push(v);
        }
        assert_eq!(ring.read_recent(4), vec![7, 8, 9, 10]);
        ring.push(11);
        assert_eq!(ring.read_recent(4), vec![8, 9, 10, 11]);
    }

    #[test]
    fn test_read_recent_idempotent_without_push() {
        let ring = SampleRing::new(8);
        for v in [3, 1, 4, 1, 5] {
            ring.push(v);
        }
        let first = ring.read_recent(5);
        let second = ring.read_recent(5);
        assert_eq!(first, second);
        assert_eq!(first, vec![3, 1, 4, 1, 5]);
    }

    #[test]
    fn test_count_clamped_to_capacity() {
        let ring = SampleRing::new(4);
        for v in 1..=4 {
            ring.push(v);
        }
        assert_eq!(ring.read_recent(100), vec![1, 2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_zero_capacity_rejected() {
        let _ = SampleRing::new(0);
    }
}
