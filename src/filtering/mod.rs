pub mod filter_loop;
pub mod moving_average;

pub use filter_loop::{FilterLoop, FilteredReading};
pub use moving_average::moving_average;
