//! Mesh simplification for raster-generated meshes
//!
//! This crate reduces an indexed [`FacetMesh`] in place:
//! - Edge collapse of locally flat vertices
//! - Consistency checks for the simplified result
//! - Debug hooks for rendering each collapse

pub mod edge_collapse;
pub mod verify;
pub mod debug;

pub use edge_collapse::*;
pub use verify::*;
pub use debug::*;

use rastermesh_core::{FacetMesh, Result};

/// Simplify a mesh in place
pub trait MeshSimplifier {
    /// Reduce the facet count of `mesh` without changing its shape
    fn simplify(&self, mesh: &mut FacetMesh) -> Result<SimplifyReport>;
}
