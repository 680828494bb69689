use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, info};

use super::classify::{BoundaryClassifier, BoundaryEdge, EXPECTED_EDGES};
use super::sample::{ObstacleOutline, ShapeSampler};
use crate::backend::{DrawingBackend, InteractionMode, SketchPlane};
use crate::config::GenerationConfig;
use crate::error::{GeometryInvalid, GungnirError, Result};
use crate::geometry::{DomainRectangle, Tile, TileGrid};
use crate::topology::{names, EdgeId};

/// Fresh names drawn before giving up on a crowded output directory.
const MAX_NAME_ATTEMPTS: usize = 16;

/// Draws one randomized geometry, labels its boundary and saves it.
///
/// Each build starts by purging the document, so attempts are independent
/// and a failed attempt leaves nothing behind that the next one depends on.
#[derive(Debug, Clone)]
pub struct GeometryBuilder {
    domain: DomainRectangle,
    sampler: ShapeSampler,
    classifier: BoundaryClassifier,
    output_dir: PathBuf,
}

impl GeometryBuilder {
    /// Creates a builder drawing outlines from `sampler` around `obstacle`.
    ///
    /// Edge midpoints are compared at 6 decimal places.
    #[must_use]
    pub fn new(
        domain: DomainRectangle,
        obstacle: Tile,
        sampler: ShapeSampler,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            domain,
            sampler,
            classifier: BoundaryClassifier::new(domain, obstacle),
            output_dir: output_dir.into(),
        }
    }

    /// Sets the number of decimal places edge midpoints are compared at.
    #[must_use]
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.classifier = self.classifier.with_decimals(decimals);
        self
    }

    /// Creates a builder from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `GungnirError::Config` if the configuration is invalid.
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        config.validate()?;
        let domain = config.domain()?;
        let obstacle = config.obstacle()?;
        let grid = TileGrid::new(obstacle, config.grid_size);
        let sampler = ShapeSampler::new(&grid, config.min_tiles, config.max_tiles);
        Ok(Self::new(domain, obstacle, sampler, config.output_dir.clone())
            .with_decimals(config.decimals))
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn sampler(&self) -> &ShapeSampler {
        &self.sampler
    }

    /// Samples an outline and builds the geometry around it.
    ///
    /// Returns the path of the saved document.
    ///
    /// # Errors
    ///
    /// Returns `GungnirError::GeometryInvalid` if the drawn geometry does not
    /// have the expected topology; any other error comes from the backend or
    /// the file system.
    pub fn build<B, R>(
        &self,
        backend: &mut B,
        doc: &mut B::Document,
        rng: &mut R,
    ) -> Result<PathBuf>
    where
        B: DrawingBackend,
        R: Rng + ?Sized,
    {
        let outline = self.sampler.sample(rng);
        self.build_with_outline(backend, doc, &outline, rng)
    }

    /// Builds the geometry around a given outline.
    ///
    /// `rng` only draws the output file name.
    ///
    /// # Errors
    ///
    /// See [`GeometryBuilder::build`].
    pub fn build_with_outline<B, R>(
        &self,
        backend: &mut B,
        doc: &mut B::Document,
        outline: &ObstacleOutline,
        rng: &mut R,
    ) -> Result<PathBuf>
    where
        B: DrawingBackend,
        R: Rng + ?Sized,
    {
        backend.purge_document(doc)?;

        backend.set_sketch_plane(doc, SketchPlane::XY)?;
        backend.set_mode(doc, InteractionMode::Sketch)?;
        backend.create_spline(doc, outline.points(), true)?;
        let (p1, p2, p3) = self.domain.corners();
        backend.create_rectangle(doc, p1, p2, p3)?;
        backend.set_mode(doc, InteractionMode::Solid)?;

        let bodies = backend.root_bodies(doc)?;
        let &[fluid] = bodies.as_slice() else {
            return Err(GeometryInvalid::BodyCount {
                actual: bodies.len(),
            }
            .into());
        };
        backend.create_named_selection(doc, &[fluid.into()], names::FLUID_BODY)?;

        let faces = backend.faces(doc, fluid)?;
        let &[fluid_face] = faces.as_slice() else {
            return Err(GeometryInvalid::FaceCount {
                actual: faces.len(),
            }
            .into());
        };
        backend.create_named_selection(doc, &[fluid_face.into()], names::FLUID)?;

        let edges = backend.edges(doc, fluid_face)?;
        if edges.len() != EXPECTED_EDGES {
            return Err(GeometryInvalid::EdgeCount {
                actual: edges.len(),
            }
            .into());
        }
        let boundary = edges
            .iter()
            .map(|&edge| -> Result<BoundaryEdge<EdgeId>> {
                Ok(BoundaryEdge::new(edge, backend.edge_midpoint(doc, edge)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let roles = self.classifier.classify(&boundary)?;
        for (role, edge) in roles.iter() {
            backend.create_named_selection(doc, &[edge.into()], role.name())?;
        }

        let path = self.output_path(backend.file_extension(), rng)?;
        backend.save_document(doc, &path)?;
        info!(path = %path.display(), points = outline.len(), "saved geometry");
        Ok(path)
    }

    /// Draws `<8 hex digits>.<extension>` names until one is free.
    fn output_path<R: Rng + ?Sized>(&self, extension: &str, rng: &mut R) -> Result<PathBuf> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let id: u32 = rng.random();
            let path = self.output_dir.join(format!("{id:08x}.{extension}"));
            match path.try_exists() {
                Ok(false) => return Ok(path),
                Ok(true) => debug!(path = %path.display(), "output name taken, drawing another"),
                Err(source) => return Err(GungnirError::io(path, source)),
            }
        }
        Err(GungnirError::io(
            &self.output_dir,
            io::Error::new(io::ErrorKind::AlreadyExists, "no free output file name"),
        ))
    }
}
