use crate::sampling::Reading;

/// Arithmetic mean of a window of readings
///
/// Uses truncating integer division toward zero: `[1, 2, 2, 2, 2]` averages
/// to 1, not 2. The truncation is deliberate; downstream consumers depend
/// on the exact integer output.
///
/// An empty window averages to 0.
pub fn moving_average(window: &[Reading]) -> Reading {
    if window.is_empty() {
        return 0;
    }
    let sum: i64 = window.iter().map(|&v| v as i64).sum();
    (sum / window.len() as i64) as Reading
}
