use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::Sender;
use serde::Serialize;

use crate::sampling::{Reading, SampleRing};

use super::moving_average;

/// One smoothed value, produced once per filter tick
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FilteredReading {
    /// Moving average of the window, in millivolts
    pub millivolts: Reading,
    /// Window size the average was computed over
    pub window_size: usize,
    /// Production time, milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

/// Periodic read-average-emit loop, the single reader of the ring
///
/// Each tick takes a consistent window of the most recent readings,
/// averages them, and sends the result downstream. No state survives
/// between ticks beyond the constant window size.
pub struct FilterLoop {
    ring: Arc<SampleRing>,
    window_size: usize,
    period: Duration,
    tx: Sender<FilteredReading>,
}

impl FilterLoop {
    pub fn new(
        ring: Arc<SampleRing>,
        window_size: usize,
        period: Duration,
        tx: Sender<FilteredReading>,
    ) -> Self {
        Self {
            ring,
            window_size,
            period,
            tx,
        }
    }

    /// One filter cycle: snapshot the window and average it
    pub fn tick(&self) -> FilteredReading {
        let window = self.ring.read_recent(self.window_size);
        FilteredReading {
            millivolts: moving_average(&window),
            window_size: self.window_size,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Run until `stop` is raised or the receiver goes away, sleeping the
    /// configured period between ticks.
    pub fn run(self, stop: Arc<AtomicBool>) {
        log::info!(
            "filter running: window {} samples, period {} ms",
            self.window_size,
            self.period.as_millis()
        );
        while !stop.load(Ordering::Relaxed) {
            let reading = self.tick();
            log::debug!("filtered: {} mV", reading.millivolts);
            if self.tx.send(reading).is_err() {
                log::warn!("filtered-value receiver dropped");
                break;
            }
            std::thread::sleep(self.period);
        }
        log::info!("filter stopped");
    }
}
