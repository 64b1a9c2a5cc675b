//! Post-simplification consistency checks
//!
//! Nothing here mutates the mesh or aborts: findings are logged and
//! returned so a caller can decide whether a broken mesh is fatal.

use rastermesh_core::{is_zero, same_point, FacetId, FacetMesh, VertexId};
use tracing::warn;

/// What is wrong with a facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetDefect {
    /// All three indices name the same vertex.
    NoSurfaceArea,
    /// Two indices name the same vertex.
    DegenerateIndices,
    /// Two cached corner points coincide.
    CoincidentPoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefectiveFacet {
    pub facet: FacetId,
    pub defect: FacetDefect,
}

/// Result of [`verify_mesh`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub facets_checked: usize,
    pub defects: Vec<DefectiveFacet>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.defects.is_empty()
    }

    pub fn count(&self, defect: FacetDefect) -> usize {
        self.defects.iter().filter(|d| d.defect == defect).count()
    }
}

/// Scan every facet for zero-area triangles.
///
/// A facet whose indices are all equal is reported as both
/// [`FacetDefect::NoSurfaceArea`] and [`FacetDefect::DegenerateIndices`].
pub fn verify_mesh(mesh: &FacetMesh) -> VerifyReport {
    let mut report = VerifyReport {
        facets_checked: mesh.facet_count(),
        defects: Vec::new(),
    };
    let mut flag = |facet: FacetId, defect: FacetDefect| {
        warn!("facet {} is defective: {:?}", facet, defect);
        report.defects.push(DefectiveFacet { facet, defect });
    };

    for (f, facet) in mesh.facets().iter().enumerate() {
        let [i0, i1, i2] = facet.indices;
        if i0 == i1 && i1 == i2 {
            flag(f, FacetDefect::NoSurfaceArea);
        }
        if !facet.has_distinct_indices() {
            flag(f, FacetDefect::DegenerateIndices);
        }
        if !facet.has_distinct_points() {
            flag(f, FacetDefect::CoincidentPoints);
        }
    }

    report
}

/// A break in the facet/vertex cross references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceIssue {
    /// A facet index names a vertex that does not exist.
    VertexOutOfRange { facet: FacetId, vertex: VertexId },
    /// A facet names a vertex that does not list it.
    MissingBackReference { facet: FacetId, vertex: VertexId },
    /// A vertex lists the same facet more than once.
    DuplicateBackReference { facet: FacetId, vertex: VertexId },
    /// A vertex lists a facet that does not name it.
    StaleBackReference { facet: FacetId, vertex: VertexId },
    /// A facet's cached point differs from its vertex.
    PointMismatch { facet: FacetId, slot: usize },
    /// A resident facet has a zero normal.
    ZeroNormal { facet: FacetId },
}

/// Exhaustive cross-check of facet and vertex references.
pub fn check_references(mesh: &FacetMesh) -> Vec<ReferenceIssue> {
    let mut issues = Vec::new();

    for (f, facet) in mesh.facets().iter().enumerate() {
        if is_zero(&facet.normal) {
            issues.push(ReferenceIssue::ZeroNormal { facet: f });
        }
        for (slot, &v) in facet.indices.iter().enumerate() {
            let Some(vertex) = mesh.vertex(v) else {
                issues.push(ReferenceIssue::VertexOutOfRange { facet: f, vertex: v });
                continue;
            };
            match vertex.facets().iter().filter(|&&o| o == f).count() {
                0 => issues.push(ReferenceIssue::MissingBackReference { facet: f, vertex: v }),
                1 => {}
                _ => issues.push(ReferenceIssue::DuplicateBackReference { facet: f, vertex: v }),
            }
            if !same_point(&facet.points[slot], &vertex.point) {
                issues.push(ReferenceIssue::PointMismatch { facet: f, slot });
            }
        }
    }

    for (v, vertex) in mesh.vertices().iter().enumerate() {
        for &f in vertex.facets() {
            if !mesh.facet(f).is_some_and(|facet| facet.references(v)) {
                issues.push(ReferenceIssue::StaleBackReference { facet: f, vertex: v });
            }
        }
    }

    for issue in &issues {
        warn!("reference check: {:?}", issue);
    }

    issues
}
