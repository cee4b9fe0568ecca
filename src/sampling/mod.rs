pub mod ring;
pub mod sampler;
pub mod source;

pub use ring::SampleRing;
pub use sampler::SamplerLoop;
pub use source::{Calibrator, Conversion, LinearCalibrator, ReplaySource, SampleSource};

/// Unconverted output of one analog-to-digital conversion (12-bit reference
/// resolution, 0-4095).
pub type RawCode = u16;

/// A raw code after conversion to millivolts.
pub type Reading = i32;

/// Largest raw code a 12-bit converter can produce.
pub const RAW_CODE_MAX: RawCode = 4095;
