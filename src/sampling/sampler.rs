use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::{Conversion, Reading, SampleRing, SampleSource};

/// Periodic acquire-convert-push loop, the single writer of the ring
///
/// Each tick requests one raw code from the source, converts it with the
/// conversion policy fixed at construction, and pushes the result. A failed
/// acquisition is logged and the tick is skipped; the ring is left
/// untouched and the loop carries on.
pub struct SamplerLoop {
    source: Box<dyn SampleSource>,
    conversion: Conversion,
    ring: Arc<SampleRing>,
    period: Duration,
}

impl SamplerLoop {
    pub fn new(
        source: Box<dyn SampleSource>,
        conversion: Conversion,
        ring: Arc<SampleRing>,
        period: Duration,
    ) -> Self {
        Self {
            source,
            conversion,
            ring,
            period,
        }
    }

    /// One acquisition cycle
    ///
    /// Returns the reading that was pushed, or `None` when the source
    /// failed and the tick was skipped.
    pub fn tick(&mut self) -> Option<Reading> {
        match self.source.acquire() {
            Ok(raw) => {
                let millivolts = self.conversion.apply(raw);
                self.ring.push(millivolts);
                log::debug!("sample: {} mV (raw {})", millivolts, raw);
                Some(millivolts)
            }
            Err(e) => {
                log::warn!("sample skipped: {}", e);
                None
            }
        }
    }

    /// Run until `stop` is raised, sleeping the configured period between
    /// ticks. The flag is only checked at tick boundaries.
    pub fn run(mut self, stop: Arc<AtomicBool>) {
        log::info!(
            "sampler running: period {} ms",
            self.period.as_millis()
        );
        while !stop.load(Ordering::Relaxed) {
            self.tick();
            std::thread::sleep(self.period);
        }
        log::info!("sampler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcquisitionError;
    use crate::sampling::{Calibrator, RawCode};

    struct ScriptedSource {
        script: Vec<Result<RawCode, AcquisitionError>>,
        position: usize,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<RawCode, AcquisitionError>>) -> Self {
            Self {
                script,
                position: 0,
            }
        }
    }

    impl SampleSource for ScriptedSource {
        fn acquire(&mut self) -> Result<RawCode, AcquisitionError> {
            let result = self.script[self.position].clone();
            self.position += 1;
            result
        }
    }

    struct DoublingCalibrator;

    impl Calibrator for DoublingCalibrator {
        fn to_millivolts(&self, raw: RawCode) -> Reading {
            raw as Reading * 2
        }
    }

    #[test]
    fn test_tick_converts_and_pushes() {
        let ring = Arc::new(SampleRing::new(8));
        let source = ScriptedSource::new(vec![Ok(100), Ok(200)]);
        let mut sampler = SamplerLoop::new(
            Box::new(source),
            Conversion::Calibrated(Box::new(DoublingCalibrator)),
            ring.clone(),
            Duration::from_millis(1),
        );

        assert_eq!(sampler.tick(), Some(200));
        assert_eq!(sampler.tick(), Some(400));
        assert_eq!(ring.read_recent(2), vec![200, 400]);
    }

    #[test]
    fn test_raw_fallback_stores_unconverted() {
        let ring = Arc::new(SampleRing::new(8));
        let source = ScriptedSource::new(vec![Ok(1500), Ok(1501)]);
        let mut sampler = SamplerLoop::new(
            Box::new(source),
            Conversion::from_calibrator(None),
            ring.clone(),
            Duration::from_millis(1),
        );

        // Fallback decided at startup applies to every tick of the run
        assert_eq!(sampler.tick(), Some(1500));
        assert_eq!(sampler.tick(), Some(1501));
        assert_eq!(ring.read_recent(2), vec![1500, 1501]);
    }

    #[test]
    fn test_failed_acquisition_leaves_ring_untouched() {
        let ring = Arc::new(SampleRing::new(8));
        let source = ScriptedSource::new(vec![
            Ok(10),
            Err(AcquisitionError::new("bus timeout")),
            Ok(30),
        ]);
        let mut sampler = SamplerLoop::new(
            Box::new(source),
            Conversion::Raw,
            ring.clone(),
            Duration::from_millis(1),
        );

        sampler.tick();
        let cursor_before = ring.cursor();
        let contents_before = ring.read_recent(8);

        assert_eq!(sampler.tick(), None);
        assert_eq!(ring.cursor(), cursor_before);
        assert_eq!(ring.read_recent(8), contents_before);

        // Next tick recovers
        assert_eq!(sampler.tick(), Some(30));
        assert_eq!(ring.read_recent(2), vec![10, 30]);
    }
}
