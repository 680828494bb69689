use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{info, warn};

use super::build::GeometryBuilder;
use crate::backend::DrawingBackend;
use crate::config::GenerationConfig;
use crate::error::{GungnirError, Result};

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    /// Geometries already in the output directory before the run.
    pub existing: usize,
    /// Paths written by this run, in order.
    pub produced: Vec<PathBuf>,
    /// Attempts discarded as invalid geometry.
    pub rejected: usize,
}

impl GenerationReport {
    /// Geometries in the output directory after the run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.existing + self.produced.len()
    }
}

/// Fills an output directory with valid geometries.
///
/// The run is resumable by inspection: it counts the files already present
/// and only produces the missing ones.
#[derive(Debug, Clone)]
pub struct GenerationLoop {
    builder: GeometryBuilder,
    target: usize,
    max_attempts: u32,
}

impl GenerationLoop {
    /// Creates a loop allowing 1000 attempts per geometry.
    #[must_use]
    pub fn new(builder: GeometryBuilder, target: usize) -> Self {
        Self {
            builder,
            target,
            max_attempts: 1000,
        }
    }

    /// Sets the number of consecutive invalid attempts tolerated per geometry.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Creates a loop from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `GungnirError::Config` if the configuration is invalid.
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        Ok(Self::new(GeometryBuilder::from_config(config)?, config.shapes)
            .with_max_attempts(config.max_attempts_per_shape))
    }

    /// Builds geometries until the output directory holds `target` of them.
    ///
    /// Nothing is asked of the backend when the directory is already full.
    ///
    /// # Errors
    ///
    /// Invalid geometry is retried; every other error is returned as is.
    /// Returns `GungnirError::AttemptsExhausted` if a single geometry fails
    /// `max_attempts` times in a row.
    pub fn run<B, R>(&self, backend: &mut B, rng: &mut R) -> Result<GenerationReport>
    where
        B: DrawingBackend,
        R: Rng + ?Sized,
    {
        let output_dir = self.builder.output_dir();
        let existing = count_outputs(output_dir, backend.file_extension())?;
        let mut report = GenerationReport {
            existing,
            ..GenerationReport::default()
        };
        if existing >= self.target {
            info!(existing, target = self.target, "output directory already complete");
            return Ok(report);
        }

        fs::create_dir_all(output_dir).map_err(|source| GungnirError::io(output_dir, source))?;
        let remaining = self.target - existing;
        info!(existing, remaining, dir = %output_dir.display(), "generating geometries");

        let mut doc = backend.open_document()?;
        let mut attempts = 0;
        while report.produced.len() < remaining {
            attempts += 1;
            match self.builder.build(backend, &mut doc, rng) {
                Ok(path) => {
                    report.produced.push(path);
                    attempts = 0;
                }
                Err(err) if err.is_recoverable() => {
                    report.rejected += 1;
                    warn!(
                        reason = %err,
                        attempt = attempts,
                        "generated geometry is incorrect, rebuilding"
                    );
                    if attempts >= self.max_attempts {
                        return Err(GungnirError::AttemptsExhausted { attempts });
                    }
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            produced = report.produced.len(),
            rejected = report.rejected,
            total = report.total(),
            "generation finished"
        );
        Ok(report)
    }
}

/// Counts regular files in `dir` carrying `extension`.
///
/// A missing directory holds no outputs.
///
/// # Errors
///
/// Returns `GungnirError::Io` if the directory exists but cannot be listed.
pub fn count_outputs(dir: &Path, extension: &str) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(source) => return Err(GungnirError::io(dir, source)),
    };
    let mut count = 0;
    for entry in entries {
        let entry = entry.map_err(|source| GungnirError::io(dir, source))?;
        let is_file = entry
            .file_type()
            .map_err(|source| GungnirError::io(entry.path(), source))?
            .is_file();
        if is_file && entry.path().extension().is_some_and(|ext| ext == extension) {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::{InteractionMode, SketchDocument, SketchKernel, SketchPlane};
    use crate::error::{BackendError, GeometryInvalid};
    use crate::geometry::{DomainRectangle, Tile, TileGrid};
    use crate::operations::sample::ShapeSampler;
    use crate::math::Point2;
    use crate::topology::{BodyId, CurveId, EdgeId, FaceId, SelectionItem};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type BackendResult<T> = std::result::Result<T, BackendError>;

    /// Sketch kernel that counts calls and can be told to misbehave.
    #[derive(Default)]
    struct Recording {
        inner: SketchKernel,
        calls: usize,
        builds: usize,
        fail_save: bool,
        /// Reports a sixth edge on every odd-numbered build.
        reject_odd_builds: bool,
        /// Drawn instead of the sampled outline.
        outline: Option<Vec<Point2>>,
    }

    impl DrawingBackend for Recording {
        type Document = SketchDocument;

        fn open_document(&mut self) -> BackendResult<SketchDocument> {
            self.calls += 1;
            self.inner.open_document()
        }

        fn purge_document(&mut self, doc: &mut SketchDocument) -> BackendResult<()> {
            self.calls += 1;
            self.builds += 1;
            self.inner.purge_document(doc)
        }

        fn set_sketch_plane(
            &mut self,
            doc: &mut SketchDocument,
            plane: SketchPlane,
        ) -> BackendResult<()> {
            self.calls += 1;
            self.inner.set_sketch_plane(doc, plane)
        }

        fn set_mode(
            &mut self,
            doc: &mut SketchDocument,
            mode: InteractionMode,
        ) -> BackendResult<()> {
            self.calls += 1;
            self.inner.set_mode(doc, mode)
        }

        fn create_spline(
            &mut self,
            doc: &mut SketchDocument,
            points: &[Point2],
            closed: bool,
        ) -> BackendResult<CurveId> {
            self.calls += 1;
            let points = self.outline.as_deref().unwrap_or(points);
            self.inner.create_spline(doc, points, closed)
        }

        fn create_rectangle(
            &mut self,
            doc: &mut SketchDocument,
            p1: Point2,
            p2: Point2,
            p3: Point2,
        ) -> BackendResult<CurveId> {
            self.calls += 1;
            self.inner.create_rectangle(doc, p1, p2, p3)
        }

        fn root_bodies(&self, doc: &SketchDocument) -> BackendResult<Vec<BodyId>> {
            self.inner.root_bodies(doc)
        }

        fn faces(&self, doc: &SketchDocument, body: BodyId) -> BackendResult<Vec<FaceId>> {
            self.inner.faces(doc, body)
        }

        fn edges(&self, doc: &SketchDocument, face: FaceId) -> BackendResult<Vec<EdgeId>> {
            let mut edges = self.inner.edges(doc, face)?;
            if self.reject_odd_builds && self.builds % 2 == 1 {
                edges.push(edges[0]);
            }
            Ok(edges)
        }

        fn edge_midpoint(&self, doc: &SketchDocument, edge: EdgeId) -> BackendResult<Point2> {
            self.inner.edge_midpoint(doc, edge)
        }

        fn create_named_selection(
            &mut self,
            doc: &mut SketchDocument,
            items: &[SelectionItem],
            name: &str,
        ) -> BackendResult<()> {
            self.calls += 1;
            self.inner.create_named_selection(doc, items, name)
        }

        fn save_document(&mut self, doc: &SketchDocument, path: &Path) -> BackendResult<()> {
            self.calls += 1;
            if self.fail_save {
                return Err(BackendError::InvalidInput("read-only backend".into()));
            }
            self.inner.save_document(doc, path)
        }

        fn file_extension(&self) -> &str {
            self.inner.file_extension()
        }
    }

    /// Fails every first attempt of a shape and succeeds on the retry.
    fn alternating() -> Recording {
        Recording {
            reject_odd_builds: true,
            outline: Some(vec![
                Point2::new(0.001, -0.008),
                Point2::new(0.008, 0.0),
                Point2::new(0.0, 0.007),
                Point2::new(-0.008, 0.001),
            ]),
            ..Recording::default()
        }
    }

    fn outside_domain(dir: &Path) -> GeometryBuilder {
        let obstacle = Tile::from_bounds(0.5, 0.51, 0.5, 0.51).unwrap();
        GeometryBuilder::new(
            DomainRectangle::new(-0.1, 0.1, -0.1, 0.1).unwrap(),
            obstacle,
            ShapeSampler::new(&TileGrid::new(obstacle, 3), 3, 8),
            dir,
        )
    }

    fn config(dir: &Path, shapes: usize) -> GenerationConfig {
        GenerationConfig {
            output_dir: dir.to_path_buf(),
            shapes,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn seeded_run_produces_target() {
        let dir = tempfile::tempdir().unwrap();
        let generator = GenerationLoop::from_config(&config(dir.path(), 3)).unwrap();
        let mut backend = Recording::default();

        let report = generator
            .run(&mut backend, &mut StdRng::seed_from_u64(2024))
            .unwrap();

        assert_eq!(report.existing, 0);
        assert_eq!(report.produced.len(), 3);
        assert_eq!(report.total(), 3);
        assert_eq!(count_outputs(dir.path(), "json").unwrap(), 3);
        for path in &report.produced {
            assert!(path.exists());
        }
    }

    #[test]
    fn complete_directory_makes_no_backend_calls() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.json", "b.json", "c.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        let generator = GenerationLoop::from_config(&config(dir.path(), 3)).unwrap();
        let mut backend = Recording::default();

        let report = generator
            .run(&mut backend, &mut StdRng::seed_from_u64(0))
            .unwrap();

        assert_eq!(backend.calls, 0);
        assert_eq!(report.existing, 3);
        assert!(report.produced.is_empty());
    }

    #[test]
    fn resume_produces_only_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("old.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let generator = GenerationLoop::from_config(&config(dir.path(), 3)).unwrap();

        let report = generator
            .run(&mut SketchKernel::default(), &mut StdRng::seed_from_u64(8))
            .unwrap();

        assert_eq!(report.existing, 1);
        assert_eq!(report.produced.len(), 2);
        assert_eq!(count_outputs(dir.path(), "json").unwrap(), 3);
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("geometry");
        let generator = GenerationLoop::from_config(&config(&out, 1)).unwrap();
        generator
            .run(&mut SketchKernel::default(), &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(count_outputs(&out, "json").unwrap(), 1);
    }

    #[test]
    fn impossible_geometry_hits_attempt_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        // The obstacle lies outside the domain, so every build has two bodies.
        let generator = GenerationLoop::new(outside_domain(dir.path()), 1).with_max_attempts(5);

        let err = generator
            .run(&mut SketchKernel::default(), &mut StdRng::seed_from_u64(4))
            .unwrap_err();

        assert!(matches!(err, GungnirError::AttemptsExhausted { attempts: 5 }));
        assert_eq!(count_outputs(dir.path(), "json").unwrap(), 0);
    }

    #[test]
    fn backend_errors_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let generator = GenerationLoop::from_config(&config(dir.path(), 2)).unwrap();
        let mut backend = Recording {
            fail_save: true,
            ..Recording::default()
        };

        let err = generator
            .run(&mut backend, &mut StdRng::seed_from_u64(6))
            .unwrap_err();

        assert!(matches!(err, GungnirError::Backend(BackendError::InvalidInput(_))));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn invalid_geometry_is_counted() {
        let dir = tempfile::tempdir().unwrap();
        let err = outside_domain(dir.path())
            .build(
                &mut SketchKernel::default(),
                &mut SketchDocument::new(),
                &mut StdRng::seed_from_u64(3),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            GungnirError::GeometryInvalid(GeometryInvalid::BodyCount { .. })
        ));
    }

    #[test]
    fn rejected_attempts_are_retried() {
        let dir = tempfile::tempdir().unwrap();
        let generator = GenerationLoop::from_config(&config(dir.path(), 4))
            .unwrap()
            .with_max_attempts(2);
        let mut backend = alternating();

        let report = generator
            .run(&mut backend, &mut StdRng::seed_from_u64(12))
            .unwrap();

        assert_eq!(report.produced.len(), 4);
        assert_eq!(report.rejected, 4);
        assert_eq!(backend.builds, 8);
        assert_eq!(count_outputs(dir.path(), "json").unwrap(), 4);
    }

    #[test]
    fn attempt_budget_resets_after_each_geometry() {
        let dir = tempfile::tempdir().unwrap();
        // Six rejections in total, never more than two in a row.
        let generator = GenerationLoop::from_config(&config(dir.path(), 6))
            .unwrap()
            .with_max_attempts(2);

        let report = generator
            .run(&mut alternating(), &mut StdRng::seed_from_u64(13))
            .unwrap();

        assert_eq!(report.produced.len(), 6);
        assert!(report.rejected > 2);
    }

    #[test]
    fn single_attempt_budget_fails_on_first_rejection() {
        let dir = tempfile::tempdir().unwrap();
        let generator = GenerationLoop::from_config(&config(dir.path(), 2))
            .unwrap()
            .with_max_attempts(1);

        let err = generator
            .run(&mut alternating(), &mut StdRng::seed_from_u64(14))
            .unwrap_err();

        assert!(matches!(err, GungnirError::AttemptsExhausted { attempts: 1 }));
        assert_eq!(count_outputs(dir.path(), "json").unwrap(), 0);
    }

    #[test]
    fn missing_directory_counts_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(count_outputs(&dir.path().join("absent"), "json").unwrap(), 0);
    }
}
