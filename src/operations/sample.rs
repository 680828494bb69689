use rand::seq::index;
use rand::Rng;

use crate::geometry::{Tile, TileGrid};
use crate::math::Point2;

/// Ordered outline points of an obstacle, one per selected tile, in ring order.
///
/// The outline is cyclic: the last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleOutline {
    points: Vec<Point2>,
}

impl ObstacleOutline {
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Picks between `n_min` and `n_max` distinct tiles, uniformly.
///
/// The count is drawn from `[n_min, n_max]`, then that many indices without
/// replacement. The result keeps the input (ring) order, not the draw order.
/// `n_max` is clamped to the number of candidates.
pub fn select_tiles<R: Rng + ?Sized>(
    tiles: &[Tile],
    n_min: usize,
    n_max: usize,
    rng: &mut R,
) -> Vec<Tile> {
    let hi = n_max.min(tiles.len());
    let lo = n_min.min(hi);
    let count = rng.random_range(lo..=hi);

    let mut picked = index::sample(rng, tiles.len(), count).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| tiles[i]).collect()
}

/// Draws a point uniformly from `tile`, bounds inclusive.
pub fn sample_point<R: Rng + ?Sized>(tile: &Tile, rng: &mut R) -> Point2 {
    Point2::new(
        rng.random_range(tile.x.min()..=tile.x.max()),
        rng.random_range(tile.y.min()..=tile.y.max()),
    )
}

/// Selects tiles and samples one point in each, preserving ring order.
///
/// No validity check happens here: nearly collinear or self-crossing
/// outlines are rejected downstream.
pub fn build_outline<R: Rng + ?Sized>(
    tiles: &[Tile],
    n_min: usize,
    n_max: usize,
    rng: &mut R,
) -> ObstacleOutline {
    let points = select_tiles(tiles, n_min, n_max, rng)
        .iter()
        .map(|tile| sample_point(tile, rng))
        .collect();
    ObstacleOutline::new(points)
}

/// Samples obstacle outlines from the ring tiles of a grid.
#[derive(Debug, Clone)]
pub struct ShapeSampler {
    tiles: Vec<Tile>,
    min_tiles: usize,
    max_tiles: usize,
}

impl ShapeSampler {
    /// Creates a sampler over the ring tiles of `grid`.
    #[must_use]
    pub fn new(grid: &TileGrid, min_tiles: usize, max_tiles: usize) -> Self {
        Self {
            tiles: grid.ring_tiles(),
            min_tiles,
            max_tiles,
        }
    }

    /// Candidate tiles in ring order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Draws a fresh outline.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ObstacleOutline {
        build_outline(&self.tiles, self.min_tiles, self.max_tiles, rng)
    }
}
