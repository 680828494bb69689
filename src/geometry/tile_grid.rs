use super::region::Tile;

/// Ring order of a 3×3 grid; the center tile (4) is not part of it.
pub const TILE_ORDER: [usize; 8] = [0, 3, 6, 7, 8, 5, 2, 1];

/// An `n × n` partition of a rectangular region.
///
/// Tiles are indexed `column * n + row`, columns running along x and rows
/// along y, both from the region's minimum corner.
#[derive(Debug, Clone, Copy)]
pub struct TileGrid {
    region: Tile,
    size: usize,
}

impl TileGrid {
    /// Creates a grid of `size × size` tiles over `region`.
    #[must_use]
    pub fn new(region: Tile, size: usize) -> Self {
        Self { region, size }
    }

    /// All tiles in index order. Their union is the region; neighbours share
    /// only their common boundary.
    #[must_use]
    pub fn partition(&self) -> Vec<Tile> {
        let columns = self.region.x.split(self.size);
        let rows = self.region.y.split(self.size);
        let mut tiles = Vec::with_capacity(self.size * self.size);
        for x in &columns {
            for y in &rows {
                tiles.push(Tile::new(*x, *y));
            }
        }
        tiles
    }

    /// Indices of the perimeter tiles in ring order.
    ///
    /// Bottom row left to right, right column upward, top row right to left,
    /// left column downward. Consecutive tiles are always neighbours.
    #[must_use]
    pub fn ring_order(&self) -> Vec<usize> {
        let n = self.size;
        let index = |column: usize, row: usize| column * n + row;
        match n {
            0 => return Vec::new(),
            1 => return vec![0],
            _ => {}
        }
        let mut order = Vec::with_capacity(4 * (n - 1));
        order.extend((0..n).map(|c| index(c, 0)));
        order.extend((1..n).map(|r| index(n - 1, r)));
        order.extend((0..n - 1).rev().map(|c| index(c, n - 1)));
        order.extend((1..n - 1).rev().map(|r| index(0, r)));
        order
    }

    /// Perimeter tiles in ring order; interior tiles are never included.
    #[must_use]
    pub fn ring_tiles(&self) -> Vec<Tile> {
        let tiles = self.partition();
        self.ring_order().into_iter().map(|i| tiles[i]).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn region() -> Tile {
        Tile::from_bounds(-0.01, 0.02, -0.03, 0.06).unwrap()
    }

    #[test]
    fn partition_covers_region_exactly() {
        let region = region();
        let tiles = TileGrid::new(region, 3).partition();
        assert_eq!(tiles.len(), 9);

        let area: f64 = tiles.iter().map(Tile::area).sum();
        assert!((area - region.area()).abs() < TOLERANCE);

        for (i, a) in tiles.iter().enumerate() {
            assert!(region.x.contains(a.x.min()) && region.x.contains(a.x.max()));
            assert!(region.y.contains(a.y.min()) && region.y.contains(a.y.max()));
            for b in &tiles[i + 1..] {
                let dx = a.x.max().min(b.x.max()) - a.x.min().max(b.x.min());
                let dy = a.y.max().min(b.y.max()) - a.y.min().max(b.y.min());
                // Overlap, if any, is degenerate (a shared edge or corner).
                assert!(dx <= TOLERANCE || dy <= TOLERANCE);
            }
        }
    }

    #[test]
    fn partition_enumerates_columns_outer() {
        let tiles = TileGrid::new(region(), 3).partition();
        assert!((tiles[0].x.min() + 0.01).abs() < TOLERANCE);
        assert!((tiles[0].y.min() + 0.03).abs() < TOLERANCE);
        // Index 1 moves up a row, index 3 moves right a column.
        assert!((tiles[1].x.min() - tiles[0].x.min()).abs() < TOLERANCE);
        assert!((tiles[1].y.min() - tiles[0].y.max()).abs() < TOLERANCE);
        assert!((tiles[3].x.min() - tiles[0].x.max()).abs() < TOLERANCE);
        assert!((tiles[3].y.min() - tiles[0].y.min()).abs() < TOLERANCE);
    }

    #[test]
    fn ring_order_for_three() {
        let grid = TileGrid::new(region(), 3);
        assert_eq!(grid.ring_order(), TILE_ORDER.to_vec());
    }

    #[test]
    fn ring_tiles_skip_center() {
        let grid = TileGrid::new(region(), 3);
        let tiles = grid.partition();
        let ring = grid.ring_tiles();
        assert_eq!(ring.len(), 8);
        assert!(!ring.contains(&tiles[4]));
        for (tile, index) in ring.iter().zip(TILE_ORDER) {
            assert_eq!(*tile, tiles[index]);
        }
    }

    #[test]
    fn ring_neighbours_share_an_edge() {
        for n in 2..6 {
            let ring = TileGrid::new(region(), n).ring_tiles();
            assert_eq!(ring.len(), 4 * (n - 1));
            for i in 0..ring.len() {
                let a = ring[i];
                let b = ring[(i + 1) % ring.len()];
                let touch_x = (a.x.max() - b.x.min()).abs() < TOLERANCE
                    || (b.x.max() - a.x.min()).abs() < TOLERANCE;
                let touch_y = (a.y.max() - b.y.min()).abs() < TOLERANCE
                    || (b.y.max() - a.y.min()).abs() < TOLERANCE;
                assert!(touch_x || touch_y);
            }
        }
    }

    #[test]
    fn small_grids() {
        assert_eq!(TileGrid::new(region(), 1).ring_order(), vec![0]);
        assert_eq!(TileGrid::new(region(), 2).ring_order(), vec![0, 2, 3, 1]);
        assert!(TileGrid::new(region(), 0).ring_order().is_empty());
    }
}
