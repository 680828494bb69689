//! JSON document format of the sketch kernel.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use slotmap::SecondaryMap;

use super::{EdgeKind, SketchCurve, SketchDocument};
use crate::backend::SketchPlane;
use crate::error::BackendError;
use crate::math::Point2;
use crate::topology::{BodyId, EdgeId, FaceId, SelectionItem};

/// File extension of saved sketch documents.
pub const EXTENSION: &str = "json";

const FORMAT: &str = "gungnir-sketch";
const VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct DocumentSnapshot {
    format: &'static str,
    version: u32,
    plane: &'static str,
    curves: Vec<CurveSnapshot>,
    edges: Vec<EdgeSnapshot>,
    faces: Vec<FaceSnapshot>,
    bodies: Vec<BodySnapshot>,
    named_selections: Vec<SelectionSnapshot>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CurveSnapshot {
    Spline { closed: bool, points: Vec<[f64; 2]> },
    Rectangle { corners: Vec<[f64; 2]> },
}

#[derive(Debug, Serialize)]
struct EdgeSnapshot {
    kind: &'static str,
    points: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
struct FaceSnapshot {
    plane: &'static str,
    outer: Vec<usize>,
    holes: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct BodySnapshot {
    faces: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct SelectionSnapshot {
    name: String,
    items: Vec<ItemSnapshot>,
}

/// Selection target, by index into the snapshot's entity lists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum ItemSnapshot {
    Body(usize),
    Face(usize),
    Edge(usize),
}

fn xy(points: &[Point2]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

fn plane_name(plane: SketchPlane) -> &'static str {
    match plane {
        SketchPlane::XY => "xy",
        SketchPlane::YZ => "yz",
        SketchPlane::ZX => "zx",
    }
}

fn edge_kind_name(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Line => "line",
        EdgeKind::Spline => "spline",
    }
}

fn build(doc: &SketchDocument) -> DocumentSnapshot {
    let mut edge_index: SecondaryMap<EdgeId, usize> = SecondaryMap::new();
    let mut edges = Vec::with_capacity(doc.edges.len());
    for (i, (id, edge)) in doc.edges.iter().enumerate() {
        edge_index.insert(id, i);
        edges.push(EdgeSnapshot {
            kind: edge_kind_name(edge.kind),
            points: xy(&edge.points),
        });
    }

    let mut face_index: SecondaryMap<FaceId, usize> = SecondaryMap::new();
    let mut faces = Vec::with_capacity(doc.faces.len());
    for (i, (id, face)) in doc.faces.iter().enumerate() {
        face_index.insert(id, i);
        let lookup = |ids: &[EdgeId]| -> Vec<usize> {
            ids.iter().filter_map(|e| edge_index.get(*e).copied()).collect()
        };
        faces.push(FaceSnapshot {
            plane: plane_name(face.plane),
            outer: lookup(&face.outer),
            holes: lookup(&face.holes),
        });
    }

    let mut body_index: SecondaryMap<BodyId, usize> = SecondaryMap::new();
    let mut bodies = Vec::with_capacity(doc.bodies.len());
    for (i, (id, body)) in doc.bodies.iter().enumerate() {
        body_index.insert(id, i);
        bodies.push(BodySnapshot {
            faces: body
                .faces
                .iter()
                .filter_map(|f| face_index.get(*f).copied())
                .collect(),
        });
    }

    let curves = doc
        .curves
        .values()
        .map(|curve| match curve {
            SketchCurve::Spline { spline, .. } => CurveSnapshot::Spline {
                closed: spline.is_closed(),
                points: xy(spline.points()),
            },
            SketchCurve::Rectangle { corners } => CurveSnapshot::Rectangle {
                corners: xy(corners),
            },
        })
        .collect();

    let named_selections = doc
        .selections
        .iter()
        .map(|s| SelectionSnapshot {
            name: s.name.clone(),
            items: s
                .items
                .iter()
                .filter_map(|item| match *item {
                    SelectionItem::Body(id) => body_index.get(id).map(|&i| ItemSnapshot::Body(i)),
                    SelectionItem::Face(id) => face_index.get(id).map(|&i| ItemSnapshot::Face(i)),
                    SelectionItem::Edge(id) => edge_index.get(id).map(|&i| ItemSnapshot::Edge(i)),
                })
                .collect(),
        })
        .collect();

    DocumentSnapshot {
        format: FORMAT,
        version: VERSION,
        plane: plane_name(doc.plane),
        curves,
        edges,
        faces,
        bodies,
        named_selections,
    }
}

/// Writes `doc` to `path` as pretty-printed JSON.
pub(super) fn write(doc: &SketchDocument, path: &Path) -> Result<(), BackendError> {
    let save_err = |source| BackendError::Save {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(save_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &build(doc))?;
    writer.flush().map_err(save_err)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::{DrawingBackend, InteractionMode, SketchKernel};

    #[test]
    fn saved_document_lists_topology_and_selections() {
        let mut kernel = SketchKernel::new(4);
        let mut doc = kernel.open_document().unwrap();
        kernel.set_mode(&mut doc, InteractionMode::Sketch).unwrap();
        kernel
            .create_rectangle(
                &mut doc,
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 1.0),
                Point2::new(2.0, 1.0),
            )
            .unwrap();
        kernel.set_mode(&mut doc, InteractionMode::Solid).unwrap();
        let body = kernel.root_bodies(&doc).unwrap()[0];
        let face = kernel.faces(&doc, body).unwrap()[0];
        let edge = kernel.edges(&doc, face).unwrap()[2];
        kernel
            .create_named_selection(&mut doc, &[edge.into()], "outlet")
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        kernel.save_document(&doc, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["format"], "gungnir-sketch");
        assert_eq!(value["plane"], "xy");
        assert_eq!(value["edges"].as_array().unwrap().len(), 4);
        assert_eq!(value["faces"][0]["outer"].as_array().unwrap().len(), 4);
        assert_eq!(value["bodies"][0]["faces"][0], 0);
        assert_eq!(value["named_selections"][0]["name"], "outlet");
        assert_eq!(value["named_selections"][0]["items"][0]["edge"], 2);
    }

    #[test]
    fn faces_record_their_sketch_plane() {
        let mut kernel = SketchKernel::default();
        let mut doc = kernel.open_document().unwrap();
        kernel.set_sketch_plane(&mut doc, SketchPlane::YZ).unwrap();
        kernel.set_mode(&mut doc, InteractionMode::Sketch).unwrap();
        kernel
            .create_rectangle(
                &mut doc,
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 1.0),
                Point2::new(1.0, 1.0),
            )
            .unwrap();
        kernel.set_sketch_plane(&mut doc, SketchPlane::ZX).unwrap();
        kernel.set_mode(&mut doc, InteractionMode::Solid).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        kernel.save_document(&doc, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["plane"], "zx");
        assert_eq!(value["faces"][0]["plane"], "zx");
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let mut kernel = SketchKernel::default();
        let doc = kernel.open_document().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("doc.json");
        let err = kernel.save_document(&doc, &path).unwrap_err();
        assert!(matches!(err, BackendError::Save { .. }));
    }
}
