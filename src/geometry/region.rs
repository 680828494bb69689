use crate::error::ConfigError;
use crate::math::Point2;

/// Closed interval `[min, max]` on the real line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `min > max` or either bound is not finite.
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "range bounds must be finite, got [{min}, {max}]"
            )));
        }
        if min > max {
            return Err(ConfigError::Invalid(format!(
                "range minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn center(&self) -> f64 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive containment.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Splits the range into `n` equal, contiguous parts.
    ///
    /// The last part ends exactly at `max` so no coverage is lost to rounding.
    #[must_use]
    pub fn split(&self, n: usize) -> Vec<Range> {
        if n == 0 {
            return Vec::new();
        }
        #[allow(clippy::cast_precision_loss)]
        let step = self.length() / n as f64;
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let lo = self.min + i as f64 * step;
                let hi = if i + 1 == n { self.max } else { lo + step };
                Range { min: lo, max: hi }
            })
            .collect()
    }
}

/// Axis-aligned rectangular region given by an x-range and a y-range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub x: Range,
    pub y: Range,
}

impl Tile {
    #[must_use]
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Creates a tile from its left, right, bottom and top bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a bound pair is reversed.
    pub fn from_bounds(left: f64, right: f64, bottom: f64, top: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            x: Range::new(left, right)?,
            y: Range::new(bottom, top)?,
        })
    }

    /// Inclusive containment on both axes.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        self.x.contains(point.x) && self.y.contains(point.y)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.x.length() * self.y.length()
    }
}

/// The rectangular flow domain, stored by its three sketch corners.
///
/// Corners are bottom-left, top-left and top-right; the bottom-right corner
/// is implied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainRectangle {
    bottom_left: Point2,
    top_left: Point2,
    top_right: Point2,
}

impl DomainRectangle {
    /// Creates the domain from its bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` unless `left < right` and `bottom < top`.
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> Result<Self, ConfigError> {
        if !(left < right && bottom < top) {
            return Err(ConfigError::Invalid(format!(
                "domain needs left < right and bottom < top, got x [{left}, {right}] y [{bottom}, {top}]"
            )));
        }
        Ok(Self {
            bottom_left: Point2::new(left, bottom),
            top_left: Point2::new(left, top),
            top_right: Point2::new(right, top),
        })
    }

    /// Returns the three sketch corners: bottom-left, top-left, top-right.
    #[must_use]
    pub fn corners(&self) -> (Point2, Point2, Point2) {
        (self.bottom_left, self.top_left, self.top_right)
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.bottom_left.x
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.top_right.x
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.bottom_left.y
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.top_left.y
    }

    #[must_use]
    pub fn horizontal_center(&self) -> f64 {
        (self.left() + self.right()) * 0.5
    }

    #[must_use]
    pub fn vertical_center(&self) -> f64 {
        (self.bottom() + self.top()) * 0.5
    }

    /// Returns `true` if `tile` lies strictly inside the domain.
    #[must_use]
    pub fn strictly_contains(&self, tile: &Tile) -> bool {
        self.left() < tile.x.min()
            && tile.x.max() < self.right()
            && self.bottom() < tile.y.min()
            && tile.y.max() < self.top()
    }
}
