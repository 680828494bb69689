pub mod build;
pub mod classify;
pub mod generate;
pub mod sample;

pub use build::GeometryBuilder;
pub use classify::{BoundaryClassifier, BoundaryEdge, BoundaryRole, RoleAssignment};
pub use generate::{GenerationLoop, GenerationReport};
pub use sample::{ObstacleOutline, ShapeSampler};
