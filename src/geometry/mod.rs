pub mod region;
pub mod spline;
pub mod tile_grid;

pub use region::{DomainRectangle, Range, Tile};
pub use spline::CatmullRomSpline;
pub use tile_grid::{TileGrid, TILE_ORDER};
