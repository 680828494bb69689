//! Solver journal for batch-simulating generated meshes.
//!
//! The journal reads a base case once, then for every mesh without results
//! swaps the mesh in, initializes, iterates and exports the flow field.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{GungnirError, Result};

/// Extension of mesh files.
pub const MESH_EXTENSION: &str = "msh";
/// Extension of exported results.
pub const RESULTS_EXTENSION: &str = "csv";
/// Extension of solution data files.
pub const DATA_EXTENSION: &str = "dat";

/// Iterations run per mesh by default.
pub const DEFAULT_ITERATIONS: u32 = 500;

/// Fields exported per mesh by default.
pub const DEFAULT_FIELDS: [&str; 6] = [
    "pressure",
    "total-pressure",
    "x-velocity",
    "y-velocity",
    "velocity-magnitude",
    "cell-wall-distance",
];

/// Writes solver journals for meshes that have no results yet.
#[derive(Debug, Clone)]
pub struct JournalWriter {
    mesh_dir: PathBuf,
    results_dir: PathBuf,
    case: PathBuf,
    iterations: u32,
    fields: Vec<String>,
}

impl JournalWriter {
    #[must_use]
    pub fn new(
        mesh_dir: impl Into<PathBuf>,
        results_dir: impl Into<PathBuf>,
        case: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mesh_dir: mesh_dir.into(),
            results_dir: results_dir.into(),
            case: case.into(),
            iterations: DEFAULT_ITERATIONS,
            fields: DEFAULT_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Meshes whose stem has no results file, sorted by stem.
    ///
    /// # Errors
    ///
    /// Returns `GungnirError::Io` if the mesh directory cannot be listed, or
    /// the results directory exists but cannot be listed.
    pub fn pending_meshes(&self) -> Result<Vec<PathBuf>> {
        let done: BTreeSet<String> =
            match files_with_extension(&self.results_dir, RESULTS_EXTENSION) {
                Ok(files) => files.iter().filter_map(|p| stem(p)).collect(),
                Err(GungnirError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    BTreeSet::new()
                }
                Err(err) => return Err(err),
            };
        let mut pending: Vec<PathBuf> = files_with_extension(&self.mesh_dir, MESH_EXTENSION)?
            .into_iter()
            .filter(|p| stem(p).is_some_and(|s| !done.contains(&s)))
            .collect();
        pending.sort_by_key(|p| stem(p));
        Ok(pending)
    }

    /// Renders the journal text.
    ///
    /// # Errors
    ///
    /// See [`JournalWriter::pending_meshes`].
    pub fn render(&self) -> Result<String> {
        Ok(self.render_meshes(&self.pending_meshes()?))
    }

    fn render_meshes(&self, meshes: &[PathBuf]) -> String {
        let mut journal = format!("/file/read-case \"{}\" yes", self.case.display());
        let fields = self.fields.join(" ");
        for mesh in meshes {
            let Some(stem) = stem(mesh) else { continue };
            let data = self.results_dir.join(format!("{stem}.{DATA_EXTENSION}"));
            let results = self.results_dir.join(format!("{stem}.{RESULTS_EXTENSION}"));
            journal.push_str(&format!(
                "\n/file/replace-mesh \"{}\" yes\
                 \n/solve/initialize/hyb-initialization yes\
                 \n/solve/iterate {}\
                 \n/file/write-data/ \"{}\"\
                 \n/file/export ascii \"{}\" () no {fields} () no yes\
                 \n",
                mesh.display(),
                self.iterations,
                data.display(),
                results.display(),
            ));
        }
        journal
    }

    /// Writes the journal to `path` and returns the number of meshes it covers.
    ///
    /// # Errors
    ///
    /// Returns `GungnirError::Io` if a directory cannot be listed or the
    /// journal cannot be written.
    pub fn write(&self, path: &Path) -> Result<usize> {
        let meshes = self.pending_meshes()?;
        fs::write(path, self.render_meshes(&meshes))
            .map_err(|source| GungnirError::io(path, source))?;
        info!(meshes = meshes.len(), path = %path.display(), "wrote solver journal");
        Ok(meshes.len())
    }
}

fn stem(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_owned)
}

fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| GungnirError::io(dir, source))? {
        let path = entry.map_err(|source| GungnirError::io(dir, source))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    Ok(files)
}
