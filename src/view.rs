//! View windows and data ranges.

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Check whether a value lies inside the range, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check whether this range lies entirely inside `other`.
    pub fn is_within(&self, other: Range) -> bool {
        self.min >= other.min && self.max <= other.max
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Union two ranges if both are finite.
    pub fn union(a: Self, b: Self) -> Option<Self> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        Some(Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        })
    }

    /// Shift both bounds by the same amount.
    pub fn shifted(&self, delta: f64) -> Self {
        Self {
            min: self.min - delta,
            max: self.max - delta,
        }
    }

    /// Add padding proportional to the span on both sides.
    pub fn padded(&self, frac: f64) -> Self {
        let padding = self.span().abs() * frac;
        Self {
            min: self.min - padding,
            max: self.max + padding,
        }
    }

    /// Widen a zero-width range so it can be used as a view window.
    ///
    /// A range collapsed on `v` becomes `v ± 5%` of `|v|`, or `v ± 1` when `v`
    /// is zero.
    pub fn nonsingular(&self) -> Self {
        if self.span() > 0.0 {
            return *self;
        }
        let center = (self.min + self.max) * 0.5;
        let half = if center == 0.0 { 1.0 } else { center.abs() * 0.05 };
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

/// Whether a surface follows its data or keeps a user-chosen window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Fit the view window to the data whenever marks change.
    #[default]
    Auto,
    /// Keep the view window until explicitly changed.
    Manual,
}

/// Visible data ranges on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// X axis range.
    pub x: Range,
    /// Y axis range.
    pub y: Range,
}

impl Viewport {
    /// Create a viewport from X and Y ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Check whether both axes are valid.
    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }

    /// Check whether this viewport lies entirely inside `other`.
    pub fn is_within(&self, other: Viewport) -> bool {
        self.x.is_within(other.x) && self.y.is_within(other.y)
    }
}
