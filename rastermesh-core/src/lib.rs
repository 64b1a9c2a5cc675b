//! Core data structures and traits for rastermesh
//!
//! This crate provides the geometry primitives, the indexed facet mesh with
//! its facet/vertex back-references, and the approximate point filter used
//! to deduplicate vertices while indexing.

pub mod point;
pub mod geometry;
pub mod facet;
pub mod vertex;
pub mod bloom;
pub mod indexed;
pub mod mesh;
pub mod traits;
pub mod error;

pub use point::*;
pub use geometry::*;
pub use facet::*;
pub use vertex::*;
pub use bloom::*;
pub use indexed::*;
pub use mesh::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
