use crate::math::{Point2, TOLERANCE};

/// Centripetal knot exponent: avoids cusps and self-loops within a span.
const ALPHA: f64 = 0.5;

/// Interpolating Catmull-Rom spline through a sequence of points.
///
/// Uses centripetal parameterization. A closed spline treats the sequence
/// as cyclic, so the last point connects back to the first.
#[derive(Debug, Clone)]
pub struct CatmullRomSpline {
    points: Vec<Point2>,
    closed: bool,
}

impl CatmullRomSpline {
    /// Creates a spline through `points`.
    #[must_use]
    pub fn new(points: Vec<Point2>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Returns the interpolated points.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of spans between consecutive interpolated points.
    #[must_use]
    pub fn span_count(&self) -> usize {
        match (self.points.len(), self.closed) {
            (0 | 1, _) => 0,
            (n, true) => n,
            (n, false) => n - 1,
        }
    }

    /// Samples the spline with `segments_per_span` segments in every span.
    ///
    /// Every interpolated point appears in the output. A closed spline does
    /// not repeat its first point at the end; an open spline ends on its
    /// last point.
    #[must_use]
    pub fn sample(&self, segments_per_span: usize) -> Vec<Point2> {
        let n = self.points.len();
        let spans = self.span_count();
        if spans == 0 {
            return self.points.clone();
        }
        let segments = segments_per_span.max(1);
        let mut out = Vec::with_capacity(spans * segments + 1);

        for span in 0..spans {
            let (p0, p1, p2, p3) = self.span_controls(span, n);
            for j in 0..segments {
                #[allow(clippy::cast_precision_loss)]
                let t = j as f64 / segments as f64;
                out.push(centripetal_point(p0, p1, p2, p3, t));
            }
        }
        if !self.closed {
            out.push(self.points[n - 1]);
        }
        out
    }

    /// Control points `(p0, p1, p2, p3)` for the span from `p1` to `p2`.
    fn span_controls(&self, span: usize, n: usize) -> (Point2, Point2, Point2, Point2) {
        let pts = &self.points;
        if self.closed {
            return (
                pts[(span + n - 1) % n],
                pts[span],
                pts[(span + 1) % n],
                pts[(span + 2) % n],
            );
        }
        let p1 = pts[span];
        let p2 = pts[span + 1];
        // Open ends use extrapolated phantom controls.
        let p0 = if span == 0 { p1 - (p2 - p1) } else { pts[span - 1] };
        let p3 = if span + 2 < n { pts[span + 2] } else { p2 + (p2 - p1) };
        (p0, p1, p2, p3)
    }
}

/// Barry-Goldman evaluation of a centripetal Catmull-Rom span at `t` in `[0, 1)`.
fn centripetal_point(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f64) -> Point2 {
    let d01 = knot_interval(p0, p1);
    let d12 = knot_interval(p1, p2);
    let d23 = knot_interval(p2, p3);

    if d12 < TOLERANCE {
        return p1;
    }
    // Coincident neighbours degenerate the knot sequence; fall back to uniform.
    let (d01, d12, d23) = if d01 < TOLERANCE || d23 < TOLERANCE {
        (1.0, 1.0, 1.0)
    } else {
        (d01, d12, d23)
    };

    let t0 = 0.0;
    let t1 = d01;
    let t2 = t1 + d12;
    let t3 = t2 + d23;
    let u = t1 + t * (t2 - t1);

    let a1 = lerp(p0, p1, (u - t0) / (t1 - t0));
    let a2 = lerp(p1, p2, (u - t1) / (t2 - t1));
    let a3 = lerp(p2, p3, (u - t2) / (t3 - t2));

    let b1 = lerp(a1, a2, (u - t0) / (t2 - t0));
    let b2 = lerp(a2, a3, (u - t1) / (t3 - t1));

    lerp(b1, b2, (u - t1) / (t2 - t1))
}

fn knot_interval(a: Point2, b: Point2) -> f64 {
    (b - a).norm().powf(ALPHA)
}

fn lerp(a: Point2, b: Point2, t: f64) -> Point2 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Vec<Point2> {
        vec![
            Point2::new(0.0, -1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
        ]
    }

    #[test]
    fn closed_sample_count() {
        let spline = CatmullRomSpline::new(diamond(), true);
        assert_eq!(spline.span_count(), 4);
        assert_eq!(spline.sample(8).len(), 32);
    }

    #[test]
    fn open_sample_count() {
        let spline = CatmullRomSpline::new(diamond(), false);
        assert_eq!(spline.span_count(), 3);
        assert_eq!(spline.sample(8).len(), 25);
    }

    #[test]
    fn passes_through_control_points() {
        let pts = diamond();
        let samples = CatmullRomSpline::new(pts.clone(), true).sample(10);
        for (i, p) in pts.iter().enumerate() {
            let s = samples[i * 10];
            assert!((s - p).norm() < 1e-12);
        }
    }

    #[test]
    fn open_spline_ends_on_last_point() {
        let pts = diamond();
        let samples = CatmullRomSpline::new(pts.clone(), false).sample(4);
        let last = samples.last().copied().unwrap_or_else(|| Point2::new(f64::NAN, f64::NAN));
        assert!((last - pts[3]).norm() < 1e-12);
    }

    #[test]
    fn span_stays_near_its_chord_for_convex_input() {
        let samples = CatmullRomSpline::new(diamond(), true).sample(16);
        for s in samples {
            assert!(s.coords.norm() < 1.3);
        }
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let samples = CatmullRomSpline::new(pts, true).sample(6);
        assert!(samples.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn single_point_is_returned_unchanged() {
        let samples = CatmullRomSpline::new(vec![Point2::new(1.0, 2.0)], true).sample(5);
        assert_eq!(samples, vec![Point2::new(1.0, 2.0)]);
    }
}
