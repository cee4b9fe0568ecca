mod signal;

pub use signal::{SyntheticConfig, SyntheticSource, noisy_sine_codes};
