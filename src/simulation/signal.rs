use std::f64::consts::PI;

use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::AcquisitionError;
use crate::sampling::{RAW_CODE_MAX, RawCode, SampleSource};

/// Synthetic signal parameters
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// Code the wave oscillates around
    pub center: f64,
    /// Peak deviation from center, in codes
    pub amplitude: f64,
    /// Full sine cycle length, in ticks
    pub ticks_per_cycle: usize,
    /// Peak uniform noise, in codes
    pub noise: f64,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Probability that a tick fails with an acquisition error (0 disables)
    pub dropout_rate: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            center: 2048.0,
            amplitude: 1024.0,
            ticks_per_cycle: 50,
            noise: 32.0,
            seed: None,
            dropout_rate: 0.0,
        }
    }
}

/// Sample source producing a noisy sine wave of raw codes
///
/// Stands in for ADC hardware in the demo binary and in tests. With a fixed
/// seed the code sequence is reproducible.
pub struct SyntheticSource {
    config: SyntheticConfig,
    rng: ChaCha8Rng,
    tick: usize,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => rand::make_rng(),
        };
        Self {
            config,
            rng,
            tick: 0,
        }
    }

    fn code_at(&mut self, tick: usize) -> RawCode {
        let phase = 2.0 * PI * tick as f64 / self.config.ticks_per_cycle as f64;
        let noise = (self.rng.random::<f64>() * 2.0 - 1.0) * self.config.noise;
        let value = self.config.center + self.config.amplitude * phase.sin() + noise;
        value.clamp(0.0, RAW_CODE_MAX as f64).round() as RawCode
    }
}

impl SampleSource for SyntheticSource {
    fn acquire(&mut self) -> Result<RawCode, AcquisitionError> {
        let tick = self.tick;
        self.tick += 1;

        if self.config.dropout_rate > 0.0 && self.rng.random::<f64>() < self.config.dropout_rate {
            return Err(AcquisitionError::new("simulated converter dropout"));
        }
        Ok(self.code_at(tick))
    }
}

/// Generate `count` raw codes of a noisy sine wave in one shot
///
/// Convenience for tests that want a fixed signal rather than a live
/// source.
pub fn noisy_sine_codes(config: &SyntheticConfig, count: usize) -> Vec<RawCode> {
    let mut source = SyntheticSource::new(SyntheticConfig {
        dropout_rate: 0.0,
        ..config.clone()
    });
    (0..count)
        .map(|_| {
            source
                .acquire()
                .expect("dropout disabled, acquire cannot fail")
        })
        .collect()
}
