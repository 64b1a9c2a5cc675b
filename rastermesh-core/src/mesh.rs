//! Compacted triangle mesh handed to exporters

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices, faces and one normal per face
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    /// Raw (non-normalized) face normals, parallel to `faces`
    pub face_normals: Vec<Vector3f>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face and its normal to the mesh
    pub fn add_face(&mut self, face: [usize; 3], normal: Vector3f) {
        self.faces.push(face);
        self.face_normals.push(normal);
    }

    /// Unit length face normals, as most file formats expect them
    pub fn unit_face_normals(&self) -> Vec<Vector3f> {
        self.face_normals
            .iter()
            .map(|n| n.try_normalize(0.0).unwrap_or_else(Vector3f::zeros))
            .collect()
    }

    /// Total surface area
    pub fn surface_area(&self) -> f32 {
        self.face_normals.iter().map(|n| n.norm() * 0.5).sum()
    }
}
