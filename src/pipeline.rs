use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, bounded};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::filtering::{FilterLoop, FilteredReading};
use crate::sampling::{Calibrator, Conversion, SampleRing, SampleSource, SamplerLoop};

/// Top-level composition point
///
/// Owns the construction of the ring and the two loops. The ring is built
/// here, once, and handed to both threads by `Arc`; nothing in the crate is
/// a process-wide singleton. The calibration fallback is also decided here,
/// once, before either thread starts.
pub struct Pipeline;

impl Pipeline {
    /// Validate the configuration, build the ring, fix the conversion
    /// policy, and spawn the sampler and filter threads.
    pub fn start(
        config: &PipelineConfig,
        source: Box<dyn SampleSource>,
        calibrator: Option<Box<dyn Calibrator>>,
    ) -> Result<PipelineHandle> {
        config.validate()?;

        let ring = Arc::new(SampleRing::new(config.ring.capacity));
        let conversion = Conversion::from_calibrator(calibrator);
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = bounded(16);

        let sampler = SamplerLoop::new(
            source,
            conversion,
            ring.clone(),
            config.sampler.period.as_duration(),
        );
        let filter = FilterLoop::new(
            ring.clone(),
            config.filter.window_size,
            config.filter.period.as_duration(),
            tx,
        );

        let sampler_thread = std::thread::Builder::new().name("sampler".into()).spawn({
            let stop = stop.clone();
            move || sampler.run(stop)
        })?;
        let filter_thread = std::thread::Builder::new().name("filter".into()).spawn({
            let stop = stop.clone();
            move || filter.run(stop)
        })?;

        Ok(PipelineHandle {
            ring,
            filtered_rx: rx,
            stop,
            sampler_thread,
            filter_thread,
        })
    }
}

/// Handle to a running pipeline
pub struct PipelineHandle {
    ring: Arc<SampleRing>,
    filtered_rx: Receiver<FilteredReading>,
    stop: Arc<AtomicBool>,
    sampler_thread: JoinHandle<()>,
    filter_thread: JoinHandle<()>,
}

impl PipelineHandle {
    /// Channel carrying one [`FilteredReading`] per filter tick
    pub fn filtered(&self) -> &Receiver<FilteredReading> {
        &self.filtered_rx
    }

    /// The shared ring, for direct inspection
    pub fn ring(&self) -> &Arc<SampleRing> {
        &self.ring
    }

    /// Raise the stop flag and join both threads
    ///
    /// Both loops check the flag at tick boundaries, so shutdown completes
    /// within roughly one period per loop. No drain is attempted; values
    /// still in flight are dropped with the channel.
    pub fn shutdown(self) {
        self.stop.store(true, Ordering::Relaxed);
        drop(self.filtered_rx);
        if self.sampler_thread.join().is_err() {
            log::error!("sampler thread panicked");
        }
        if self.filter_thread.join().is_err() {
            log::error!("filter thread panicked");
        }
    }
}
