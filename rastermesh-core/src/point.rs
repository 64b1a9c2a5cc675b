//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Index of a facet inside a [`FacetMesh`](crate::FacetMesh)
pub type FacetId = usize;

/// Index of a vertex inside a [`FacetMesh`](crate::FacetMesh)
pub type VertexId = usize;

/// Placeholder index for facet slots that have not been indexed yet
pub const INVALID: usize = usize::MAX;

/// Are two points the same location.
///
/// Every coordinate must compare equal; there is no tolerance.
#[inline]
pub fn same_point(a: &Point3f, b: &Point3f) -> bool {
    a.x == b.x && a.y == b.y && a.z == b.z
}

/// Are three points pairwise distinct.
#[inline]
pub fn distinct_points(a: &Point3f, b: &Point3f, c: &Point3f) -> bool {
    !same_point(a, b) && !same_point(b, c) && !same_point(c, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_exact() {
        let a = Point3f::new(1.0, 2.0, 3.0);
        assert!(same_point(&a, &Point3f::new(1.0, 2.0, 3.0)));
        assert!(!same_point(&a, &Point3f::new(1.0, 2.0, 3.000001)));
    }

    #[test]
    fn test_signed_zero_is_same_point() {
        let a = Point3f::new(0.0, -0.0, 0.0);
        let b = Point3f::new(-0.0, 0.0, 0.0);
        assert!(same_point(&a, &b));
    }

    #[test]
    fn test_distinct_points() {
        let a = Point3f::new(0.0, 0.0, 0.0);
        let b = Point3f::new(1.0, 0.0, 0.0);
        let c = Point3f::new(0.0, 1.0, 0.0);
        assert!(distinct_points(&a, &b, &c));
        assert!(!distinct_points(&a, &b, &a));
    }
}
