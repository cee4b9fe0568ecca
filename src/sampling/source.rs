use std::path::Path;

use crate::error::{AcquisitionError, PipelineError, Result};

use super::{RAW_CODE_MAX, RawCode, Reading};

/// Producer of raw ADC codes, one per sampler tick
///
/// An `Err` is a transient hardware read failure: the caller logs it and
/// skips the tick.
pub trait SampleSource: Send {
    fn acquire(&mut self) -> std::result::Result<RawCode, AcquisitionError>;
}

/// Raw-code to millivolt conversion backed by a calibration curve
pub trait Calibrator: Send {
    fn to_millivolts(&self, raw: RawCode) -> Reading;
}

/// Conversion policy, fixed once at pipeline construction
///
/// When no calibrator is available at startup the raw code is used as the
/// millivolt value unmodified, for the remainder of the run. The decision
/// is never revisited per sample.
pub enum Conversion {
    Calibrated(Box<dyn Calibrator>),
    Raw,
}

impl Conversion {
    pub fn from_calibrator(calibrator: Option<Box<dyn Calibrator>>) -> Self {
        match calibrator {
            Some(c) => {
                log::info!("calibration ready");
                Self::Calibrated(c)
            }
            None => {
                log::warn!("calibration not available, using raw ADC codes");
                Self::Raw
            }
        }
    }

    pub fn apply(&self, raw: RawCode) -> Reading {
        match self {
            Self::Calibrated(c) => c.to_millivolts(raw),
            Self::Raw => raw as Reading,
        }
    }
}

/// Affine raw-to-millivolt map
///
/// Maps the full 12-bit code range onto `0..=full_scale_mv`, the behavior
/// of an ideal converter with `full_scale_mv` of input range (reference:
/// 3300 mV full scale).
pub struct LinearCalibrator {
    full_scale_mv: Reading,
}

impl LinearCalibrator {
    pub fn new(full_scale_mv: Reading) -> Self {
        Self { full_scale_mv }
    }
}

impl Default for LinearCalibrator {
    fn default() -> Self {
        Self::new(3300)
    }
}

impl Calibrator for LinearCalibrator {
    fn to_millivolts(&self, raw: RawCode) -> Reading {
        (raw as i64 * self.full_scale_mv as i64 / RAW_CODE_MAX as i64) as Reading
    }
}

/// Sample source replaying raw codes from a text file
///
/// The file holds whitespace-separated integers in `0..=4095`. Playback
/// wraps around at the end of the file so the pipeline keeps running
/// indefinitely, like a looping signal generator.
pub struct ReplaySource {
    codes: Vec<RawCode>,
    position: usize,
}

impl ReplaySource {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let mut codes = Vec::new();
        for token in text.split_whitespace() {
            let code: u32 = token
                .parse()
                .map_err(|_| PipelineError::Config(format!("invalid raw code: {}", token)))?;
            if code > RAW_CODE_MAX as u32 {
                return Err(PipelineError::Config(format!(
                    "raw code {} out of range (max {})",
                    code, RAW_CODE_MAX
                )));
            }
            codes.push(code as RawCode);
        }
        if codes.is_empty() {
            return Err(PipelineError::Config("replay file holds no codes".into()));
        }
        Ok(Self { codes, position: 0 })
    }
}

impl SampleSource for ReplaySource {
    fn acquire(&mut self) -> std::result::Result<RawCode, AcquisitionError> {
        let code = self.codes[self.position];
        self.position = (self.position + 1) % self.codes.len();
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_calibrator_endpoints() {
        let cal = LinearCalibrator::default();
        assert_eq!(cal.to_millivolts(0), 0);
        assert_eq!(cal.to_millivolts(RAW_CODE_MAX), 3300);
    }

    #[test]
    fn test_linear_calibrator_midpoint() {
        let cal = LinearCalibrator::new(3300);
        // 2048/4095 * 3300 = 1650.4..., truncated
        assert_eq!(cal.to_millivolts(2048), 1650);
    }

    #[test]
    fn test_conversion_raw_fallback_is_identity() {
        let conversion = Conversion::from_calibrator(None);
        assert_eq!(conversion.apply(1500), 1500);
        assert_eq!(conversion.apply(0), 0);
        assert_eq!(conversion.apply(RAW_CODE_MAX), 4095);
    }

    #[test]
    fn test_replay_source_wraps() {
        let mut source = ReplaySource::from_text("10 20 30").unwrap();
        let codes: Vec<RawCode> = (0..7).map(|_| source.acquire().unwrap()).collect();
        assert_eq!(codes, vec![10, 20, 30, 10, 20, 30, 10]);
    }

    #[test]
    fn test_replay_source_rejects_out_of_range() {
        assert!(ReplaySource::from_text("4096").is_err());
        assert!(ReplaySource::from_text("-5").is_err());
        assert!(ReplaySource::from_text("volts").is_err());
        assert!(ReplaySource::from_text("").is_err());
    }
}
