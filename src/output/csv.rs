use super::{Formatter, iso8601_timestamp};
use crate::filtering::FilteredReading;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, reading: &FilteredReading) -> String {
        format!(
            "{},{},{}",
            iso8601_timestamp(),
            reading.millivolts,
            reading.window_size
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,millivolts,window_size")
    }
}
