//! Drawing backend contract.
//!
//! The generator never touches geometry directly: it issues sketch commands
//! and reads back the resulting topology through [`DrawingBackend`]. Every
//! call receives the document it acts on, so several documents can coexist.

pub mod sketch;

use std::fmt;
use std::path::Path;

use crate::error::BackendError;
use crate::math::Point2;
use crate::topology::{BodyId, CurveId, EdgeId, FaceId, SelectionItem};

pub use sketch::{SketchDocument, SketchKernel};

/// Plane that 2D sketch coordinates are placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SketchPlane {
    #[default]
    XY,
    YZ,
    ZX,
}

/// Authoring mode of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Curves may be drawn on the sketch plane.
    Sketch,
    /// Closed sketch curves have been turned into bodies.
    #[default]
    Solid,
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sketch => f.write_str("sketch"),
            Self::Solid => f.write_str("solid"),
        }
    }
}

/// Capability surface of a CAD backend used to draw and label geometries.
pub trait DrawingBackend {
    /// Mutable document state the backend operates on.
    type Document;

    /// Opens a new, empty document.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot create a document.
    fn open_document(&mut self) -> Result<Self::Document, BackendError>;

    /// Deletes all bodies, curves, datum geometry and selections.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    fn purge_document(&mut self, doc: &mut Self::Document) -> Result<(), BackendError>;

    /// Selects the plane subsequent sketch curves are drawn on.
    ///
    /// # Errors
    ///
    /// Returns an error if the plane cannot be activated.
    fn set_sketch_plane(
        &mut self,
        doc: &mut Self::Document,
        plane: SketchPlane,
    ) -> Result<(), BackendError>;

    /// Switches between sketch and solid mode.
    ///
    /// Leaving sketch mode solidifies the sketch into planar bodies.
    ///
    /// # Errors
    ///
    /// Returns an error if the sketch cannot be solidified.
    fn set_mode(
        &mut self,
        doc: &mut Self::Document,
        mode: InteractionMode,
    ) -> Result<(), BackendError>;

    /// Draws a spline through `points`.
    ///
    /// # Errors
    ///
    /// Returns an error outside sketch mode or for too few points.
    fn create_spline(
        &mut self,
        doc: &mut Self::Document,
        points: &[Point2],
        closed: bool,
    ) -> Result<CurveId, BackendError>;

    /// Draws a rectangle from three consecutive corners; the fourth is implied.
    ///
    /// # Errors
    ///
    /// Returns an error outside sketch mode or for degenerate corners.
    fn create_rectangle(
        &mut self,
        doc: &mut Self::Document,
        p1: Point2,
        p2: Point2,
        p3: Point2,
    ) -> Result<CurveId, BackendError>;

    /// Returns the top-level bodies of the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be queried.
    fn root_bodies(&self, doc: &Self::Document) -> Result<Vec<BodyId>, BackendError>;

    /// Returns the faces of `body`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::EntityNotFound` for an unknown body.
    fn faces(&self, doc: &Self::Document, body: BodyId) -> Result<Vec<FaceId>, BackendError>;

    /// Returns the boundary edges of `face`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::EntityNotFound` for an unknown face.
    fn edges(&self, doc: &Self::Document, face: FaceId) -> Result<Vec<EdgeId>, BackendError>;

    /// Evaluates the midpoint of `edge`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::EntityNotFound` for an unknown edge.
    fn edge_midpoint(&self, doc: &Self::Document, edge: EdgeId) -> Result<Point2, BackendError>;

    /// Binds `items` under `name`, replacing any selection already called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if an item does not exist.
    fn create_named_selection(
        &mut self,
        doc: &mut Self::Document,
        items: &[SelectionItem],
        name: &str,
    ) -> Result<(), BackendError>;

    /// Writes the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Save` on I/O failure.
    fn save_document(&mut self, doc: &Self::Document, path: &Path) -> Result<(), BackendError>;

    /// Native file extension of saved documents, without the dot.
    fn file_extension(&self) -> &str;
}
