pub mod backend;
pub mod config;
pub mod error;
pub mod geometry;
pub mod journal;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{GungnirError, Result};
