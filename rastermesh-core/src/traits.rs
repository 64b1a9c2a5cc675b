//! Core traits for rastermesh

use crate::{indexed::*, mesh::*, point::*, Result};

/// Receiver for triangles produced by a raster generator
pub trait FacetSink {
    /// Add one triangle; degenerate triangles are reported, not stored
    fn add_facet(&mut self, p0: Point3f, p1: Point3f, p2: Point3f) -> Result<FacetInsert>;
}

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        Point3f::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        )
    }
}

fn bounds<'a>(points: impl IntoIterator<Item = &'a Point3f>) -> (Point3f, Point3f) {
    let mut points = points.into_iter();
    let Some(first) = points.next() else {
        return (Point3f::origin(), Point3f::origin());
    };

    let mut min = *first;
    let mut max = *first;

    for point in points {
        min.x = min.x.min(point.x);
        min.y = min.y.min(point.y);
        min.z = min.z.min(point.z);

        max.x = max.x.max(point.x);
        max.y = max.y.max(point.y);
        max.z = max.z.max(point.z);
    }

    (min, max)
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds(&self.vertices)
    }
}

impl Drawable for FacetMesh {
    /// Bounds of the facets currently in the mesh (isolated vertices ignored)
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds(self.facets().iter().flat_map(|f| f.points.iter()))
    }
}
