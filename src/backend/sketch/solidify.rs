//! Turns closed sketch curves into planar regions.
//!
//! Every closed curve becomes a loop. Loops are split wherever they cross
//! themselves or each other (rectangles also at their corners); each piece
//! becomes one boundary edge. The largest loop bounds the main region,
//! loops inside or crossing it bound the same region, and any remaining loop
//! forms a region of its own.

use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::polygon_2d::{
    cumulative_lengths, point_at_length, point_in_polygon, signed_area_2d,
};
use crate::math::{Point2, TOLERANCE};

use super::EdgeKind;

/// A closed curve, flattened to a polyline without a repeated end point.
#[derive(Debug, Clone)]
pub(super) struct Loop {
    pub kind: EdgeKind,
    pub points: Vec<Point2>,
    /// Vertex indices where the loop must be split regardless of crossings.
    pub corners: Vec<usize>,
}

impl Loop {
    pub fn new(kind: EdgeKind, points: &[Point2], corners: Vec<usize>) -> Self {
        Self {
            kind,
            points: dedup_closed(points),
            corners,
        }
    }

    fn segment(&self, i: usize) -> (Point2, Point2) {
        let n = self.points.len();
        (self.points[i], self.points[(i + 1) % n])
    }

    fn segment_count(&self) -> usize {
        if self.points.len() < 2 {
            0
        } else {
            self.points.len()
        }
    }

    /// Vertices with the first point appended, for arc-length queries.
    fn closed_polyline(&self) -> Vec<Point2> {
        let mut pts = self.points.clone();
        if let Some(first) = self.points.first() {
            pts.push(*first);
        }
        pts
    }
}

/// A boundary edge produced by splitting a loop.
#[derive(Debug, Clone)]
pub(super) struct Piece {
    pub kind: EdgeKind,
    pub points: Vec<Point2>,
}

/// One planar region: outer boundary pieces and hole pieces.
#[derive(Debug, Clone, Default)]
pub(super) struct Region {
    pub outer: Vec<Piece>,
    pub holes: Vec<Piece>,
}

impl Region {
    pub fn edge_count(&self) -> usize {
        self.outer.len() + self.holes.len()
    }
}

/// Builds the regions bounded by `loops`.
pub(super) fn solidify(loops: &[Loop]) -> Vec<Region> {
    let loops: Vec<&Loop> = loops.iter().filter(|l| l.points.len() >= 2).collect();
    if loops.is_empty() {
        return Vec::new();
    }

    let offsets: Vec<Vec<f64>> = loops.iter().map(|l| vertex_offsets(l)).collect();
    let mut cuts: Vec<Vec<f64>> = loops
        .iter()
        .zip(&offsets)
        .map(|(l, off)| l.corners.iter().filter_map(|&c| off.get(c).copied()).collect())
        .collect();
    let mut touches = vec![vec![false; loops.len()]; loops.len()];

    for a in 0..loops.len() {
        for b in a..loops.len() {
            for (s, t) in crossings(loops[a], loops[b], &offsets[a], &offsets[b], a == b) {
                cuts[a].push(s);
                cuts[b].push(t);
                touches[a][b] = true;
                touches[b][a] = true;
            }
        }
    }

    let pieces: Vec<Vec<Piece>> = loops
        .iter()
        .zip(cuts.iter_mut())
        .map(|(l, c)| split_loop(l, c))
        .collect();

    let outer = (0..loops.len())
        .max_by(|&i, &j| {
            let ai = signed_area_2d(&loops[i].points).abs();
            let aj = signed_area_2d(&loops[j].points).abs();
            ai.total_cmp(&aj)
        })
        .unwrap_or(0);

    let mut main = Region {
        outer: pieces[outer].clone(),
        holes: Vec::new(),
    };
    let mut regions = Vec::new();
    for (k, l) in loops.iter().enumerate() {
        if k == outer {
            continue;
        }
        let inside = point_in_polygon(&l.points[0], &loops[outer].points);
        if inside || touches[k][outer] {
            main.holes.extend(pieces[k].iter().cloned());
        } else {
            regions.push(Region {
                outer: pieces[k].clone(),
                holes: Vec::new(),
            });
        }
    }
    regions.insert(0, main);
    regions
}

/// Drops consecutive duplicate vertices, including a closing duplicate.
fn dedup_closed(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|q| (p - q).norm() > TOLERANCE) {
            out.push(*p);
        }
    }
    while out.len() > 1 && (out[out.len() - 1] - out[0]).norm() <= TOLERANCE {
        out.pop();
    }
    out
}

/// Arc-length offset of every vertex; the last entry is the loop length.
fn vertex_offsets(l: &Loop) -> Vec<f64> {
    cumulative_lengths(&l.closed_polyline())
}

/// Crossing positions `(offset on a, offset on b)` between two loops.
///
/// For a loop against itself, neighbouring segments (which share a vertex)
/// are skipped.
fn crossings(a: &Loop, b: &Loop, off_a: &[f64], off_b: &[f64], same: bool) -> Vec<(f64, f64)> {
    let (na, nb) = (a.segment_count(), b.segment_count());
    let mut found = Vec::new();
    for i in 0..na {
        let (a0, a1) = a.segment(i);
        let len_a = off_a[i + 1] - off_a[i];
        let first_j = if same { i + 2 } else { 0 };
        for j in first_j..nb {
            if same && i == 0 && j == nb - 1 {
                continue;
            }
            let (b0, b1) = b.segment(j);
            if let Some((_, t, u)) = segment_segment_intersect_2d(&a0, &a1, &b0, &b1) {
                let len_b = off_b[j + 1] - off_b[j];
                found.push((off_a[i] + t * len_a, off_b[j] + u * len_b));
            }
        }
    }
    found
}

/// Splits a loop at the given arc-length offsets.
///
/// Without cuts the whole loop is one closed piece starting at its first
/// vertex.
fn split_loop(l: &Loop, cuts: &mut Vec<f64>) -> Vec<Piece> {
    let closed = l.closed_polyline();
    let offsets = cumulative_lengths(&closed);
    let total = offsets.last().copied().unwrap_or(0.0);

    normalize_cuts(cuts, total);
    if cuts.is_empty() {
        return vec![Piece {
            kind: l.kind,
            points: closed,
        }];
    }

    let n = l.points.len();
    let mut pieces = Vec::with_capacity(cuts.len());
    for k in 0..cuts.len() {
        let start = cuts[k];
        let end = if k + 1 < cuts.len() {
            cuts[k + 1]
        } else {
            cuts[0] + total
        };

        let mut points = Vec::new();
        points.extend(point_at_length(&closed, start));
        for lap in 0..2 {
            let base = f64::from(lap) * total;
            for (i, off) in offsets.iter().take(n).enumerate() {
                let s = base + off;
                if s > start + TOLERANCE && s < end - TOLERANCE {
                    points.push(l.points[i]);
                }
            }
        }
        let end_local = if end >= total { end - total } else { end };
        points.extend(point_at_length(&closed, end_local));

        pieces.push(Piece {
            kind: l.kind,
            points,
        });
    }
    pieces
}

/// Wraps cuts into `[0, total)`, sorts them and merges near-duplicates.
fn normalize_cuts(cuts: &mut Vec<f64>, total: f64) {
    if total <= TOLERANCE {
        cuts.clear();
        return;
    }
    for c in cuts.iter_mut() {
        *c = c.rem_euclid(total);
    }
    cuts.sort_by(f64::total_cmp);
    cuts.dedup_by(|b, a| (*b - *a).abs() <= TOLERANCE);
    if cuts.len() > 1 {
        let (first, last) = (cuts[0], cuts[cuts.len() - 1]);
        if first + total - last <= TOLERANCE {
            cuts.pop();
        }
    }
}
