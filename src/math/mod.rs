pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Default number of decimal places used when matching sketch coordinates.
pub const DEFAULT_DECIMALS: u32 = 6;

/// Rounds `value` half away from zero to `decimals` decimal places.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    (value * scale).round() / scale
}

/// Returns `true` if both coordinates agree after rounding to `decimals` places.
///
/// Absorbs the noise a sketch kernel leaves on coordinates it computed
/// itself (edge midpoints, split points).
#[must_use]
#[allow(clippy::float_cmp)]
pub fn points_close(a: &Point2, b: &Point2, decimals: u32) -> bool {
    round_to(a.x, decimals) == round_to(b.x, decimals)
        && round_to(a.y, decimals) == round_to(b.y, decimals)
}
