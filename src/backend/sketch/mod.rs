//! In-memory sketch kernel.
//!
//! A small planar modeler that implements [`DrawingBackend`]: splines and
//! rectangles are drawn in sketch mode, and switching to solid mode turns
//! the closed curves into bodies with one planar face each.

mod snapshot;
mod solidify;

use std::path::Path;

use slotmap::SlotMap;
use tracing::debug;

use super::{DrawingBackend, InteractionMode, SketchPlane};
use crate::error::BackendError;
use crate::geometry::CatmullRomSpline;
use crate::math::polygon_2d::polyline_midpoint;
use crate::math::{Point2, TOLERANCE};
use crate::topology::{BodyId, CurveId, EdgeId, FaceId, NamedSelection, SelectionItem};

use solidify::{Loop, Region};

/// Default number of samples per spline span.
pub const DEFAULT_SPLINE_SEGMENTS: usize = 16;

/// Shape of the curve an edge was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Line,
    Spline,
}

/// A curve drawn in sketch mode.
#[derive(Debug, Clone)]
pub enum SketchCurve {
    /// Interpolating spline with its sampled polyline.
    Spline {
        spline: CatmullRomSpline,
        samples: Vec<Point2>,
    },
    /// Axis-free rectangle given by its four corners in drawing order.
    Rectangle { corners: [Point2; 4] },
}

impl SketchCurve {
    fn is_closed(&self) -> bool {
        match self {
            Self::Spline { spline, .. } => spline.is_closed(),
            Self::Rectangle { .. } => true,
        }
    }

    fn to_loop(&self) -> Loop {
        match self {
            Self::Spline { samples, .. } => Loop::new(EdgeKind::Spline, samples, Vec::new()),
            Self::Rectangle { corners } => Loop::new(EdgeKind::Line, corners, vec![0, 1, 2, 3]),
        }
    }
}

/// Data associated with a boundary edge.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub kind: EdgeKind,
    /// Polyline of the edge; closed edges repeat their first point.
    pub points: Vec<Point2>,
}

/// Data associated with a planar face.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub plane: SketchPlane,
    pub outer: Vec<EdgeId>,
    pub holes: Vec<EdgeId>,
}

impl FaceData {
    /// Outer edges followed by hole edges.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.outer.iter().chain(&self.holes).copied()
    }
}

/// Data associated with a body.
#[derive(Debug, Clone)]
pub struct BodyData {
    pub faces: Vec<FaceId>,
}

/// Document state of the sketch kernel.
///
/// Entities reference each other via typed IDs (generational indices);
/// purging clears every arena.
#[derive(Debug, Default)]
pub struct SketchDocument {
    plane: SketchPlane,
    mode: InteractionMode,
    curves: SlotMap<CurveId, SketchCurve>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    bodies: SlotMap<BodyId, BodyData>,
    selections: Vec<NamedSelection>,
}

impl SketchDocument {
    /// Creates a new, empty document in solid mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn plane(&self) -> SketchPlane {
        self.plane
    }

    /// Number of curves still in the sketch (not yet solidified).
    #[must_use]
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Named selections in creation order.
    #[must_use]
    pub fn selections(&self) -> &[NamedSelection] {
        &self.selections
    }

    /// Looks up a selection by name.
    #[must_use]
    pub fn selection(&self, name: &str) -> Option<&NamedSelection> {
        self.selections.iter().find(|s| s.name == name)
    }

    /// Returns the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the document.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, BackendError> {
        self.edges
            .get(id)
            .ok_or(BackendError::EntityNotFound("edge"))
    }

    /// Returns the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the document.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, BackendError> {
        self.faces
            .get(id)
            .ok_or(BackendError::EntityNotFound("face"))
    }

    /// Returns the body data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the document.
    pub fn body(&self, id: BodyId) -> Result<&BodyData, BackendError> {
        self.bodies
            .get(id)
            .ok_or(BackendError::EntityNotFound("body"))
    }

    fn check_item(&self, item: SelectionItem) -> Result<(), BackendError> {
        match item {
            SelectionItem::Body(id) => self.body(id).map(|_| ()),
            SelectionItem::Face(id) => self.face(id).map(|_| ()),
            SelectionItem::Edge(id) => self.edge(id).map(|_| ()),
        }
    }

    fn require_sketch(&self) -> Result<(), BackendError> {
        if self.mode == InteractionMode::Sketch {
            Ok(())
        } else {
            Err(BackendError::WrongMode { expected: "sketch" })
        }
    }

    fn clear(&mut self) {
        self.curves.clear();
        self.edges.clear();
        self.faces.clear();
        self.bodies.clear();
        self.selections.clear();
    }

    /// Renames the selection `from` to `to`, dropping any selection already named `to`.
    fn rename_selection(&mut self, from: &str, to: &str) -> Result<(), BackendError> {
        if from == to {
            return Ok(());
        }
        self.selections.retain(|s| s.name != to);
        let selection = self
            .selections
            .iter_mut()
            .find(|s| s.name == from)
            .ok_or(BackendError::EntityNotFound("named selection"))?;
        to.clone_into(&mut selection.name);
        Ok(())
    }

    /// First `Group<n>` name not already taken.
    fn default_selection_name(&self) -> String {
        let mut n = self.selections.len() + 1;
        loop {
            let name = format!("Group{n}");
            if self.selection(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }

    /// Consumes the closed sketch curves and adds one body per region.
    fn solidify(&mut self) {
        let closed: Vec<CurveId> = self
            .curves
            .iter()
            .filter(|(_, c)| c.is_closed())
            .map(|(id, _)| id)
            .collect();
        let loops: Vec<Loop> = closed
            .iter()
            .filter_map(|id| self.curves.remove(*id))
            .map(|c| c.to_loop())
            .collect();

        let regions = solidify::solidify(&loops);
        debug!(
            loops = loops.len(),
            regions = regions.len(),
            edges = regions.first().map_or(0, Region::edge_count),
            "solidified sketch"
        );
        for region in regions {
            self.add_region(region);
        }
    }

    fn add_region(&mut self, region: Region) -> BodyId {
        let Region { outer, holes } = region;
        let outer = outer
            .into_iter()
            .map(|p| {
                self.edges.insert(EdgeData {
                    kind: p.kind,
                    points: p.points,
                })
            })
            .collect();
        let holes = holes
            .into_iter()
            .map(|p| {
                self.edges.insert(EdgeData {
                    kind: p.kind,
                    points: p.points,
                })
            })
            .collect();
        let face = self.faces.insert(FaceData {
            plane: self.plane,
            outer,
            holes,
        });
        self.bodies.insert(BodyData { faces: vec![face] })
    }
}

/// Drawing backend that keeps documents in memory and saves them as JSON.
#[derive(Debug, Clone)]
pub struct SketchKernel {
    spline_segments: usize,
}

impl Default for SketchKernel {
    fn default() -> Self {
        Self::new(DEFAULT_SPLINE_SEGMENTS)
    }
}

impl SketchKernel {
    /// Creates a kernel sampling `spline_segments` points per spline span.
    #[must_use]
    pub fn new(spline_segments: usize) -> Self {
        Self {
            spline_segments: spline_segments.max(1),
        }
    }
}

impl DrawingBackend for SketchKernel {
    type Document = SketchDocument;

    fn open_document(&mut self) -> Result<SketchDocument, BackendError> {
        Ok(SketchDocument::new())
    }

    fn purge_document(&mut self, doc: &mut SketchDocument) -> Result<(), BackendError> {
        doc.clear();
        Ok(())
    }

    fn set_sketch_plane(
        &mut self,
        doc: &mut SketchDocument,
        plane: SketchPlane,
    ) -> Result<(), BackendError> {
        doc.plane = plane;
        Ok(())
    }

    fn set_mode(
        &mut self,
        doc: &mut SketchDocument,
        mode: InteractionMode,
    ) -> Result<(), BackendError> {
        if doc.mode == InteractionMode::Sketch && mode == InteractionMode::Solid {
            doc.solidify();
        }
        doc.mode = mode;
        Ok(())
    }

    fn create_spline(
        &mut self,
        doc: &mut SketchDocument,
        points: &[Point2],
        closed: bool,
    ) -> Result<CurveId, BackendError> {
        doc.require_sketch()?;
        let required = if closed { 3 } else { 2 };
        if points.len() < required {
            return Err(BackendError::InvalidInput(format!(
                "spline needs at least {required} points, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(BackendError::InvalidInput(
                "spline points must be finite".into(),
            ));
        }
        let spline = CatmullRomSpline::new(points.to_vec(), closed);
        let samples = spline.sample(self.spline_segments);
        Ok(doc.curves.insert(SketchCurve::Spline { spline, samples }))
    }

    fn create_rectangle(
        &mut self,
        doc: &mut SketchDocument,
        p1: Point2,
        p2: Point2,
        p3: Point2,
    ) -> Result<CurveId, BackendError> {
        doc.require_sketch()?;
        let side_a = p2 - p1;
        let side_b = p3 - p2;
        if side_a.norm() < TOLERANCE || side_b.norm() < TOLERANCE {
            return Err(BackendError::InvalidInput(
                "rectangle corners must be distinct".into(),
            ));
        }
        if side_a.dot(&side_b).abs() > TOLERANCE * side_a.norm() * side_b.norm() {
            return Err(BackendError::InvalidInput(
                "rectangle sides must be perpendicular".into(),
            ));
        }
        let p4 = p1 + side_b;
        Ok(doc.curves.insert(SketchCurve::Rectangle {
            corners: [p1, p2, p3, p4],
        }))
    }

    fn root_bodies(&self, doc: &SketchDocument) -> Result<Vec<BodyId>, BackendError> {
        Ok(doc.bodies.keys().collect())
    }

    fn faces(&self, doc: &SketchDocument, body: BodyId) -> Result<Vec<FaceId>, BackendError> {
        Ok(doc.body(body)?.faces.clone())
    }

    fn edges(&self, doc: &SketchDocument, face: FaceId) -> Result<Vec<EdgeId>, BackendError> {
        Ok(doc.face(face)?.edges().collect())
    }

    fn edge_midpoint(&self, doc: &SketchDocument, edge: EdgeId) -> Result<Point2, BackendError> {
        polyline_midpoint(&doc.edge(edge)?.points)
            .ok_or_else(|| BackendError::InvalidInput("edge has no points".into()))
    }

    fn create_named_selection(
        &mut self,
        doc: &mut SketchDocument,
        items: &[SelectionItem],
        name: &str,
    ) -> Result<(), BackendError> {
        for item in items {
            doc.check_item(*item)?;
        }
        let default_name = doc.default_selection_name();
        doc.selections
            .push(NamedSelection::new(default_name.clone(), items.to_vec()));
        doc.rename_selection(&default_name, name)?;
        debug!(selection = %name, items = items.len(), "created named selection");
        Ok(())
    }

    fn save_document(&mut self, doc: &SketchDocument, path: &Path) -> Result<(), BackendError> {
        snapshot::write(doc, path)
    }

    fn file_extension(&self) -> &str {
        snapshot::EXTENSION
    }
}
