use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. A repeated
/// closing vertex contributes nothing.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Even-odd point-in-polygon test. Points on the boundary are unspecified.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (&polygon[i], &polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pj.x + (point.y - pj.y) / (pi.y - pj.y) * (pi.x - pj.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Cumulative arc length at each vertex of an open polyline.
///
/// The first entry is `0.0`; the last is the total length.
#[must_use]
pub fn cumulative_lengths(points: &[Point2]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, pt) in points.iter().enumerate() {
        if i > 0 {
            total += (pt - points[i - 1]).norm();
        }
        lengths.push(total);
    }
    lengths
}

/// Total length of an open polyline.
#[must_use]
pub fn polyline_length(points: &[Point2]) -> f64 {
    cumulative_lengths(points).last().copied().unwrap_or(0.0)
}

/// Returns the point at arc length `s` along an open polyline.
///
/// `s` is clamped to the polyline's length. Returns `None` for an empty
/// polyline.
#[must_use]
pub fn point_at_length(points: &[Point2], s: f64) -> Option<Point2> {
    let first = *points.first()?;
    let mut walked = 0.0;
    for pair in points.windows(2) {
        let seg = pair[1] - pair[0];
        let len = seg.norm();
        if len > TOLERANCE && walked + len >= s {
            let t = ((s - walked) / len).clamp(0.0, 1.0);
            return Some(pair[0] + seg * t);
        }
        walked += len;
    }
    Some(points.last().copied().unwrap_or(first))
}

/// Returns the point halfway along an open polyline, by arc length.
#[must_use]
pub fn polyline_midpoint(points: &[Point2]) -> Option<Point2> {
    point_at_length(points, polyline_length(points) * 0.5)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert_relative_eq!(signed_area_2d(&unit_square()), 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = unit_square();
        pts.reverse();
        assert_relative_eq!(signed_area_2d(&pts), -1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn point_in_square() {
        let sq = unit_square();
        assert!(point_in_polygon(&Point2::new(0.5, 0.5), &sq));
        assert!(!point_in_polygon(&Point2::new(1.5, 0.5), &sq));
        assert!(!point_in_polygon(&Point2::new(0.5, -0.5), &sq));
    }

    #[test]
    fn lengths_accumulate() {
        let lengths = cumulative_lengths(&unit_square());
        assert_eq!(lengths.len(), 4);
        assert_relative_eq!(lengths[3], 3.0, epsilon = TOLERANCE);
    }

    #[test]
    fn midpoint_of_l_shape() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
        ];
        let mid = polyline_midpoint(&pts).unwrap();
        assert_relative_eq!(mid.x, 2.0, epsilon = TOLERANCE);
        assert!(mid.y.abs() < TOLERANCE);
    }

    #[test]
    fn point_at_length_clamps() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let end = point_at_length(&pts, 5.0).unwrap();
        assert_relative_eq!(end.x, 1.0, epsilon = TOLERANCE);
        let start = point_at_length(&pts, -1.0).unwrap();
        assert!(start.x.abs() < TOLERANCE);
        assert!(point_at_length(&[], 0.0).is_none());
    }
}
