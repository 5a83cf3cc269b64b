/// A closed range of `f32` values `[min, max]`.
///
/// Used for parameter validation and for mapping ray distances into the
/// normalized `[0, 1]` range that fog blending works in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    ///
    /// NaN is never contained.
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Maps x to `[0, 1]`, clamping values outside the interval.
    ///
    /// A zero-sized interval maps everything to 1.
    pub fn normalize(&self, x: f32) -> f32 {
        let size = self.size();
        if size <= 0.0 {
            return 1.0;
        }
        (self.clamp(x) - self.min) / size
    }

    /// The unit interval `[0, 1]`.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}
