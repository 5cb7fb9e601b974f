/// A closed range of real values, `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    ///
    /// NaN is never contained.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }
}
