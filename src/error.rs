use std::path::PathBuf;

use thiserror::Error;

use crate::operations::classify::BoundaryRole;

/// Top-level error type for geometry generation.
#[derive(Debug, Error)]
pub enum GungnirError {
    #[error(transparent)]
    GeometryInvalid(#[from] GeometryInvalid),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no valid geometry after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GungnirError {
    /// Returns `true` if the error only rejects the current attempt.
    ///
    /// Degenerate geometry is expected from random sampling and is retried;
    /// every other error points at the environment or configuration.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::GeometryInvalid(_))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// The generated fluid region does not have the expected topology.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryInvalid {
    #[error("expected exactly 1 body, found {actual}")]
    BodyCount { actual: usize },

    #[error("expected exactly 1 face on the fluid body, found {actual}")]
    FaceCount { actual: usize },

    #[error("there must be exactly 5 edges: inlet, outlet, symmetry-up, symmetry-down and wall (found {actual})")]
    EdgeCount { actual: usize },

    #[error("edge selection failed: no edge found for {role}")]
    MissingRole { role: BoundaryRole },

    #[error("edge selection failed: {count} edges found for {role}")]
    AmbiguousRole { role: BoundaryRole, count: usize },

    #[error("edge {index} matches {matches} roles")]
    UnclaimedEdge { index: usize, matches: usize },
}

/// Errors raised by a drawing backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("operation requires {expected} mode")]
    WrongMode { expected: &'static str },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to save document to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors related to loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Convenience type alias for results using [`GungnirError`].
pub type Result<T> = std::result::Result<T, GungnirError>;
