use super::Formatter;
use crate::filtering::FilteredReading;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, reading: &FilteredReading) -> String {
        // FilteredReading is a flat Serialize struct; this cannot fail
        serde_json::to_string(reading).unwrap_or_default()
    }
}
