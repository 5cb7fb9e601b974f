//! Numeric helpers shared by the lux crates.

mod interval;
mod nearest;

pub use interval::Interval;
pub use nearest::nearest_index;
