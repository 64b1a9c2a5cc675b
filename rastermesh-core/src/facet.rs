//! Triangle records stored in the facet arena

use crate::geometry::facet_normal;
use crate::point::{distinct_points, Point3f, Vector3f, VertexId, INVALID};
use serde::{Deserialize, Serialize};

/// A triangle of the mesh.
///
/// `points` caches the location of the vertex each index names and `normal`
/// is the raw (non-normalized) cross product of those points. The mesh keeps
/// both in sync whenever an index is retargeted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub indices: [VertexId; 3],
    pub points: [Point3f; 3],
    pub normal: Vector3f,
}

impl Facet {
    /// Build an unindexed facet, or `None` if the triangle has no area.
    pub fn new(p0: Point3f, p1: Point3f, p2: Point3f) -> Option<Self> {
        let normal = facet_normal(&p0, &p1, &p2)?;
        Some(Self {
            indices: [INVALID; 3],
            points: [p0, p1, p2],
            normal,
        })
    }

    /// Corner slot holding vertex `v`, if any.
    #[inline]
    pub fn slot_of(&self, v: VertexId) -> Option<usize> {
        self.indices.iter().position(|&i| i == v)
    }

    #[inline]
    pub fn references(&self, v: VertexId) -> bool {
        self.indices.contains(&v)
    }

    /// True once the facet has been through indexing.
    pub fn is_indexed(&self) -> bool {
        !self.indices.contains(&INVALID)
    }

    pub fn has_distinct_indices(&self) -> bool {
        let [a, b, c] = self.indices;
        a != b && b != c && c != a
    }

    pub fn has_distinct_points(&self) -> bool {
        let [a, b, c] = &self.points;
        distinct_points(a, b, c)
    }

    /// Corner points with the one in `slot` replaced by `point`.
    pub fn points_with(&self, slot: usize, point: Point3f) -> [Point3f; 3] {
        let mut points = self.points;
        points[slot] = point;
        points
    }

    /// Centroid of the cached points.
    pub fn centroid(&self) -> Point3f {
        let [a, b, c] = &self.points;
        Point3f::from((a.coords + b.coords + c.coords) / 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_facet() -> Facet {
        Facet::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn test_new_facet_is_unindexed() {
        let facet = unit_facet();
        assert!(!facet.is_indexed());
        assert_eq!(facet.normal, Vector3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_degenerate_facet_rejected() {
        let p = Point3f::new(1.0, 1.0, 1.0);
        assert!(Facet::new(p, p, Point3f::new(2.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_slot_lookup() {
        let mut facet = unit_facet();
        facet.indices = [4, 7, 9];
        assert_eq!(facet.slot_of(7), Some(1));
        assert_eq!(facet.slot_of(3), None);
        assert!(facet.references(9));
        assert!(facet.has_distinct_indices());
    }

    #[test]
    fn test_points_with_replacement() {
        let facet = unit_facet();
        let moved = facet.points_with(2, Point3f::new(1.0, 0.0, 0.0));
        assert_eq!(moved[1], moved[2]);
        assert_eq!(moved[0], facet.points[0]);
    }

    #[test]
    fn test_centroid() {
        let facet = Facet::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(3.0, 0.0, 0.0),
            Point3f::new(0.0, 3.0, 0.0),
        )
        .unwrap();
        assert_eq!(facet.centroid(), Point3f::new(1.0, 1.0, 0.0));
    }
}
