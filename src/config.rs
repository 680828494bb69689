use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{DomainRectangle, Tile};

/// Axis-aligned bounds as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }
}

/// Parameters of a generation run.
///
/// Every field has a default, so a configuration file only needs the values
/// it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Flow domain rectangle.
    pub domain: Bounds,
    /// Region the obstacle outline is sampled in.
    pub obstacle: Bounds,
    /// Directory finished geometries are written to.
    pub output_dir: PathBuf,
    /// Number of geometries the output directory should hold.
    pub shapes: usize,
    /// Fewest ring tiles an outline passes through.
    pub min_tiles: usize,
    /// Most ring tiles an outline passes through.
    pub max_tiles: usize,
    /// Tiles per side of the obstacle grid.
    pub grid_size: usize,
    /// Decimal places edge midpoints are compared at.
    pub decimals: u32,
    /// Spline samples per span in the sketch kernel.
    pub spline_segments: usize,
    /// Attempts allowed for a single geometry before the run fails.
    pub max_attempts_per_shape: u32,
    /// Seed of the random source; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            domain: Bounds::new(-0.1, 0.1, -0.1, 0.1),
            obstacle: Bounds::new(-0.01, 0.01, -0.01, 0.01),
            output_dir: PathBuf::from("geometry"),
            shapes: 2000,
            min_tiles: 3,
            max_tiles: 8,
            grid_size: 3,
            decimals: crate::math::DEFAULT_DECIMALS,
            spline_segments: crate::backend::sketch::DEFAULT_SPLINE_SEGMENTS,
            max_attempts_per_shape: 1000,
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Parses a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON or unknown fields.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read, or
    /// `ConfigError::Parse` if it is not a valid configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// The flow domain.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` unless `left < right` and `bottom < top`.
    pub fn domain(&self) -> Result<DomainRectangle, ConfigError> {
        let b = &self.domain;
        DomainRectangle::new(b.left, b.right, b.bottom, b.top)
    }

    /// The obstacle sampling region.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a bound pair is reversed.
    pub fn obstacle(&self) -> Result<Tile, ConfigError> {
        let b = &self.obstacle;
        Tile::from_bounds(b.left, b.right, b.bottom, b.top)
    }

    /// Number of ring tiles outlines are sampled from.
    #[must_use]
    pub fn ring_len(&self) -> usize {
        self.grid_size.saturating_sub(1) * 4
    }

    /// Checks that the configuration can produce geometries.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let domain = self.domain()?;
        let obstacle = self.obstacle()?;
        if !domain.strictly_contains(&obstacle) {
            return Err(ConfigError::Invalid(
                "obstacle region must lie strictly inside the domain".into(),
            ));
        }
        if obstacle.area() <= 0.0 {
            return Err(ConfigError::Invalid(
                "obstacle region must have a positive area".into(),
            ));
        }
        if self.grid_size < 3 {
            return Err(ConfigError::Invalid(format!(
                "grid size must be at least 3, got {}",
                self.grid_size
            )));
        }
        let ring = self.ring_len();
        if !(3 <= self.min_tiles && self.min_tiles <= self.max_tiles && self.max_tiles <= ring) {
            return Err(ConfigError::Invalid(format!(
                "tile counts need 3 <= min ({}) <= max ({}) <= {ring}",
                self.min_tiles, self.max_tiles
            )));
        }
        if self.spline_segments == 0 {
            return Err(ConfigError::Invalid(
                "spline segments must be at least 1".into(),
            ));
        }
        if self.max_attempts_per_shape == 0 {
            return Err(ConfigError::Invalid(
                "max attempts per shape must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
