//! Configuration for the sampling-and-smoothing pipeline.
//!
//! All values here are plain data; the pipeline consumes them at
//! construction time and never re-reads them. Defaults match the reference
//! deployment: a 256-slot ring, 100 ms sampler and filter periods, and a
//! 5-sample smoothing window.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// Tick period specification
///
/// Can be specified as a duration or as a rate in Hz. Useful on the command
/// line where "10hz" is often more natural than "100ms".
///
/// # Parsing formats
/// - `100ms` - period in milliseconds
/// - `1.5s` - period in seconds
/// - `10hz` or `10Hz` - rate in Hz (converted to its period)
///
/// # Example
/// ```
/// use smoothvolt::config::Period;
///
/// let period: Period = "10hz".parse().unwrap();
/// assert_eq!(period.as_duration().as_millis(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Period(Duration);

impl Period {
    /// Create from a period in milliseconds
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Create from a rate in Hz
    pub fn from_hz(hz: f64) -> Self {
        Self(Duration::from_secs_f64(1.0 / hz))
    }

    /// Get the period as a [`Duration`]
    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Get the equivalent rate in Hz
    pub fn as_hz(&self) -> f64 {
        1.0 / self.0.as_secs_f64()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0.as_millis())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        // Check for Hz suffix (case insensitive)
        if let Some(num) = s
            .strip_suffix("hz")
            .or_else(|| s.strip_suffix("Hz"))
            .or_else(|| s.strip_suffix("HZ"))
        {
            let hz: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid rate: {}", s))?;
            if hz <= 0.0 {
                return Err("rate must be positive".to_string());
            }
            return Ok(Self::from_hz(hz));
        }

        // Millisecond suffix; must come before "s" since "ms" ends in "s"
        if let Some(num) = s.strip_suffix("ms") {
            let ms: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid period: {}", s))?;
            if ms <= 0.0 {
                return Err("period must be positive".to_string());
            }
            return Ok(Self(Duration::from_secs_f64(ms / 1000.0)));
        }

        if let Some(num) = s.strip_suffix("s") {
            let secs: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid period: {}", s))?;
            if secs <= 0.0 {
                return Err("period must be positive".to_string());
            }
            return Ok(Self(Duration::from_secs_f64(secs)));
        }

        Err(format!(
            "unrecognized period: {} (expected e.g. 100ms, 1.5s, 10hz)",
            s
        ))
    }
}

impl TryFrom<String> for Period {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// System-wide pipeline configuration
///
/// Use `PipelineConfig::default()` for the reference values, or load a TOML
/// file with [`PipelineConfig::from_toml_file`].
///
/// # Example
/// ```
/// use smoothvolt::config::PipelineConfig;
///
/// let mut config = PipelineConfig::default();
/// config.filter.window_size = 8;
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sample ring configuration
    pub ring: RingConfig,
    /// Sampler loop configuration
    pub sampler: SamplerConfig,
    /// Filter loop configuration
    pub filter: FilterConfig,
}

/// Sample ring configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Number of slots in the ring (fixed for the life of the process)
    pub capacity: usize,
}

/// Sampler loop configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Time between consecutive acquisitions
    pub period: Period,
}

/// Filter loop configuration
///
/// The filter period is independent of the sampler period even though both
/// default to the same value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Time between consecutive filter outputs
    pub period: Period,
    /// Moving average window size (must not exceed ring capacity)
    pub window_size: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            period: Period::from_millis(100),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            period: Period::from_millis(100),
            window_size: 5,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| PipelineError::Config(format!("{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.ring.capacity == 0 {
            return Err(PipelineError::Config(
                "ring capacity must be positive".into(),
            ));
        }
        if self.filter.window_size == 0 {
            return Err(PipelineError::Config(
                "filter window size must be positive".into(),
            ));
        }
        if self.filter.window_size > self.ring.capacity {
            return Err(PipelineError::Config(format!(
                "filter window size {} exceeds ring capacity {}",
                self.filter.window_size, self.ring.capacity
            )));
        }
        Ok(())
    }
}
