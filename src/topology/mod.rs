slotmap::new_key_type! {
    /// Unique identifier for a sketch curve in a document.
    pub struct CurveId;
}

slotmap::new_key_type! {
    /// Unique identifier for an edge in a document.
    pub struct EdgeId;
}

slotmap::new_key_type! {
    /// Unique identifier for a face in a document.
    pub struct FaceId;
}

slotmap::new_key_type! {
    /// Unique identifier for a body in a document.
    pub struct BodyId;
}

/// A document entity that can be bound to a named selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionItem {
    Body(BodyId),
    Face(FaceId),
    Edge(EdgeId),
}

impl From<BodyId> for SelectionItem {
    fn from(id: BodyId) -> Self {
        Self::Body(id)
    }
}

impl From<FaceId> for SelectionItem {
    fn from(id: FaceId) -> Self {
        Self::Face(id)
    }
}

impl From<EdgeId> for SelectionItem {
    fn from(id: EdgeId) -> Self {
        Self::Edge(id)
    }
}

/// Names of the selections a finished geometry carries.
pub mod names {
    pub const FLUID_BODY: &str = "fluid_body";
    pub const FLUID: &str = "fluid";
}

/// A named, persisted reference to document entities.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSelection {
    pub name: String,
    pub items: Vec<SelectionItem>,
}

impl NamedSelection {
    #[must_use]
    pub fn new(name: impl Into<String>, items: Vec<SelectionItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}
