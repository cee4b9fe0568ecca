use super::Formatter;
use crate::filtering::FilteredReading;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, reading: &FilteredReading) -> String {
        if self.verbose {
            format!(
                "Filtered: {:>5} mV [window: {}, ts: {}]",
                reading.millivolts, reading.window_size, reading.timestamp_ms
            )
        } else {
            format!("Filtered: {:>5} mV", reading.millivolts)
        }
    }
}
