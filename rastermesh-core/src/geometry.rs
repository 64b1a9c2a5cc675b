//! Geometry primitives shared by the mesh store and the simplifier
//!
//! Normals are kept as the raw cross product of the two edge vectors and are
//! never normalized: exact comparisons on them stay meaningful for the
//! axis-aligned, integer-spaced geometry a raster generator produces.

use crate::point::{Point3f, Vector3f};

/// Surface normal of the triangle `v0, v1, v2`.
///
/// Computed as `(v1 - v0) x (v2 - v0)`. Returns `None` when the triangle is
/// degenerate, i.e. the cross product is exactly the zero vector, or when a
/// non-finite coordinate makes it meaningless.
#[inline]
pub fn facet_normal(v0: &Point3f, v1: &Point3f, v2: &Point3f) -> Option<Vector3f> {
    let a = v1 - v0;
    let b = v2 - v0;
    let n = a.cross(&b);

    if is_zero(&n) || !n.iter().all(|c| c.is_finite()) {
        None
    } else {
        Some(n)
    }
}

/// True if every component of `v` is exactly zero.
#[inline]
pub fn is_zero(v: &Vector3f) -> bool {
    v.x == 0.0 && v.y == 0.0 && v.z == 0.0
}

/// Check that two normals point the same way.
///
/// The normals must not oppose each other (non-negative dot product) and
/// must be exactly parallel (zero cross product).
pub fn same_normal(n1: &Vector3f, n2: &Vector3f) -> bool {
    if n1.dot(n2) < 0.0 {
        return false;
    }

    is_zero(&n1.cross(n2))
}
