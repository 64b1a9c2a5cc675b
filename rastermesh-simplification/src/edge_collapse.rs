//! Edge collapse simplification
//!
//! Greedy collapse of locally flat vertices. A vertex whose owning facets all
//! share one normal can be merged into a flat neighbour without changing the
//! surface, as long as none of the facets that move would tilt or flip.
//!
//! Vertices are visited in arena order by a single cursor. After a merge the
//! cursor stays put: the surviving vertex has new neighbours and is looked at
//! again before moving on.

use crate::debug::{CollapseObserver, NoopObserver};
use crate::verify::{verify_mesh, VerifyReport};
use crate::MeshSimplifier;
use itertools::Itertools;
use rastermesh_core::{
    distinct_points, facet_normal, is_zero, same_normal, Error, FacetId, FacetMesh, FacetMove,
    Result, VertexId, FACET_CAPACITY,
};
use tracing::{debug, error, info};

/// Bloom filter sizing used when `simplify` has to index the mesh itself.
pub const DEFAULT_BLOOM_COMPLEXITY: u32 = 10;

/// How [`find_adjacent`] picks among the neighbours that could be merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NeighborSelection {
    /// First acceptable neighbour in facet order, then corner order.
    #[default]
    FirstValid,
    /// Acceptable neighbour owning the fewest facets. Ties go to scan order.
    FewestFacets,
}

/// What the cursor does after looking at one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanStep {
    /// A merge happened; look at the same vertex again.
    Revisit,
    Advance,
}

/// Summary of one simplification run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimplifyReport {
    pub facets_before: usize,
    pub facets_after: usize,
    /// Vertices owning at least one facet.
    pub vertices_before: usize,
    pub vertices_after: usize,
    /// Edge merges performed.
    pub collapses: usize,
    /// Facet check of the result, if it was requested.
    pub verify: Option<VerifyReport>,
}

impl SimplifyReport {
    pub fn facets_removed(&self) -> usize {
        self.facets_before - self.facets_after
    }

    /// Fraction of the original facets that are gone.
    pub fn reduction_ratio(&self) -> f32 {
        if self.facets_before == 0 {
            0.0
        } else {
            self.facets_removed() as f32 / self.facets_before as f32
        }
    }
}

// ============================================================
// Collapse predicates
// ============================================================

/// True if every consecutive pair of facets owning `v` shares a normal.
///
/// An isolated vertex is trivially a candidate; it just has nothing to merge.
pub fn is_candidate(mesh: &FacetMesh, v: VertexId) -> bool {
    let Some(vertex) = mesh.vertex(v) else {
        return false;
    };

    vertex
        .facets()
        .iter()
        .tuple_windows()
        .all(|(&a, &b)| match (mesh.facet(a), mesh.facet(b)) {
            (Some(fa), Some(fb)) => same_normal(&fa.normal, &fb.normal),
            _ => false,
        })
}

/// Neighbours of `v` joined to it by an edge only one of its facets uses.
///
/// Empty for a vertex in the interior of a closed fan.
pub fn boundary_neighbors(mesh: &FacetMesh, v: VertexId) -> Vec<VertexId> {
    let Some(vertex) = mesh.vertex(v) else {
        return Vec::new();
    };

    let mut uses: Vec<(VertexId, usize)> = Vec::new();
    for facet in vertex.facets().iter().filter_map(|&f| mesh.facet(f)) {
        for &w in facet.indices.iter().filter(|&&w| w != v) {
            match uses.iter_mut().find(|(u, _)| *u == w) {
                Some((_, count)) => *count += 1,
                None => uses.push((w, 1)),
            }
        }
    }

    uses.into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(w, _)| w)
        .collect()
}

/// A boundary vertex may only slide along a straight stretch of its own
/// boundary, onto one of the two rim neighbours.
fn boundary_allows(mesh: &FacetMesh, from: VertexId, to: VertexId) -> bool {
    let rim = boundary_neighbors(mesh, from);
    if rim.is_empty() {
        return true;
    }

    let &[a, b] = rim.as_slice() else {
        return false;
    };
    if to != a && to != b {
        return false;
    }

    let (Some(pa), Some(p), Some(pb)) = (mesh.vertex(a), mesh.vertex(from), mesh.vertex(b)) else {
        return false;
    };
    let inward = p.point - pa.point;
    let outward = pb.point - p.point;

    is_zero(&inward.cross(&outward)) && inward.dot(&outward) > 0.0
}

/// Check whether every facet of `from` survives `from` moving onto `to`.
///
/// A facet passes if its normal keeps the same direction, or if it loses
/// its area only because two of its corners now coincide (it runs along the
/// collapsing edge and is about to disappear). Any other loss of area, a
/// tilt, or a flip rejects the move.
pub fn check_move_ok(mesh: &FacetMesh, from: VertexId, to: VertexId, preserve_boundary: bool) -> bool {
    let (Some(source), Some(target)) = (mesh.vertex(from), mesh.vertex(to)) else {
        return false;
    };

    if preserve_boundary && !boundary_allows(mesh, from, to) {
        return false;
    }

    for &f in source.facets() {
        let Some(facet) = mesh.facet(f) else {
            return false;
        };
        let Some(slot) = facet.slot_of(from) else {
            error!("vertex {} lists facet {} which does not reference it", from, f);
            return false;
        };

        let [a, b, c] = facet.points_with(slot, target.point);
        match facet_normal(&a, &b, &c) {
            Some(normal) => {
                if !same_normal(&normal, &facet.normal) {
                    return false;
                }
            }
            None => {
                if distinct_points(&a, &b, &c) {
                    return false;
                }
            }
        }
    }

    true
}

/// Pick a neighbour of `v` that can be merged into it.
///
/// The neighbour must be a candidate itself, the merged vertex must stay
/// within [`FACET_CAPACITY`], and [`check_move_ok`] must approve moving the
/// neighbour onto `v`.
pub fn find_adjacent(
    mesh: &FacetMesh,
    v: VertexId,
    selection: NeighborSelection,
    preserve_boundary: bool,
) -> Option<VertexId> {
    let vertex = mesh.vertex(v)?;
    let owned = vertex.facet_count();

    let mut acceptable = vertex
        .facets()
        .iter()
        .filter_map(|&f| mesh.facet(f))
        .flat_map(|facet| facet.indices)
        .filter(|&c| c != v)
        .filter(|&c| {
            mesh.vertex(c).is_some_and(|neighbor| {
                // the two facets along the shared edge vanish in the merge
                (owned + neighbor.facet_count()).saturating_sub(2) <= FACET_CAPACITY
            })
        })
        .filter(|&c| is_candidate(mesh, c) && check_move_ok(mesh, c, v, preserve_boundary));

    match selection {
        NeighborSelection::FirstValid => acceptable.next(),
        NeighborSelection::FewestFacets => {
            acceptable.min_by_key(|&c| mesh.vertex(c).map_or(usize::MAX, |n| n.facet_count()))
        }
    }
}

// ============================================================
// Merge
// ============================================================

/// A facet owned by both vertices.
fn shared_facet(mesh: &FacetMesh, start: VertexId, end: VertexId) -> Option<FacetId> {
    mesh.vertex(end)?
        .facets()
        .iter()
        .copied()
        .find(|&f| mesh.facet(f).is_some_and(|facet| facet.references(start)))
}

fn first_facet(mesh: &FacetMesh, v: VertexId) -> Option<FacetId> {
    mesh.vertex(v)?.facets().first().copied()
}

/// Merge vertex `end` into `start`.
///
/// Facets on both vertices are removed first, then every remaining facet of
/// `end` is moved onto `start`. A move that leaves a facet without area
/// removes that facet as well. `end` is left isolated in the vertex arena.
///
/// Returns the number of facets removed. Callers normally get `end` from
/// [`find_adjacent`]; other pairs may fail part way with the mesh still
/// consistent.
pub fn merge_edge(mesh: &mut FacetMesh, start: VertexId, end: VertexId) -> Result<usize> {
    if start == end {
        return Err(Error::InvalidData(format!("cannot merge vertex {} into itself", start)));
    }
    if mesh.vertex(start).is_none() || mesh.vertex(end).is_none() {
        return Err(Error::InvalidData(format!(
            "merge of {} into {} is out of range ({} vertices)",
            end,
            start,
            mesh.vertex_count()
        )));
    }

    let before = mesh.facet_count();

    while let Some(f) = shared_facet(mesh, start, end) {
        mesh.remove_facet(f)?;
    }

    while let Some(f) = first_facet(mesh, end) {
        if mesh.move_facet_vertex(f, end, start)? == FacetMove::Degenerate {
            mesh.remove_facet(f)?;
        }
    }

    Ok(before - mesh.facet_count())
}

// ============================================================
// Edge Collapse Simplifier
// ============================================================

/// Greedy simplifier for meshes built from axis-aligned raster cells.
///
/// Only vertices whose neighbourhood is flat are removed, so the shape of
/// the surface never changes; large coplanar regions shrink to a handful of
/// triangles.
#[derive(Debug, Clone)]
pub struct EdgeCollapseSimplifier {
    /// Bloom filter sizing if the mesh still needs indexing
    pub bloom_complexity: u32,
    /// Tie-break among mergeable neighbours
    pub selection: NeighborSelection,
    /// Keep the outline of open meshes: boundary vertices only slide along
    /// straight boundary runs
    pub preserve_boundary: bool,
    /// Run [`verify_mesh`] on the result
    pub verify: bool,
}

impl Default for EdgeCollapseSimplifier {
    fn default() -> Self {
        Self {
            bloom_complexity: DEFAULT_BLOOM_COMPLEXITY,
            selection: NeighborSelection::FirstValid,
            preserve_boundary: true,
            verify: true,
        }
    }
}

impl EdgeCollapseSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(
        bloom_complexity: u32,
        selection: NeighborSelection,
        preserve_boundary: bool,
        verify: bool,
    ) -> Self {
        Self {
            bloom_complexity,
            selection,
            preserve_boundary,
            verify,
        }
    }

    /// Simplify `mesh`, reporting every merge to `observer`.
    ///
    /// An unindexed mesh is indexed first.
    pub fn simplify_with_observer(
        &self,
        mesh: &mut FacetMesh,
        observer: &mut dyn CollapseObserver,
    ) -> Result<SimplifyReport> {
        if !mesh.is_indexed() {
            debug!("mesh not indexed, indexing with complexity {}", self.bloom_complexity);
            mesh.index_mesh(self.bloom_complexity)?;
        }

        let mut report = SimplifyReport {
            facets_before: mesh.facet_count(),
            vertices_before: mesh.live_vertex_count(),
            ..SimplifyReport::default()
        };
        observer.simplify_started(mesh);

        let mut cursor = 0;
        while cursor < mesh.vertex_count() {
            match self.step(mesh, cursor, observer)? {
                ScanStep::Revisit => report.collapses += 1,
                ScanStep::Advance => cursor += 1,
            }
        }

        observer.simplify_finished(mesh);

        report.facets_after = mesh.facet_count();
        report.vertices_after = mesh.live_vertex_count();
        if self.verify {
            report.verify = Some(verify_mesh(mesh));
        }

        info!(
            "simplified {} facets to {} ({} vertices to {}) in {} collapses",
            report.facets_before,
            report.facets_after,
            report.vertices_before,
            report.vertices_after,
            report.collapses
        );

        Ok(report)
    }

    fn step(
        &self,
        mesh: &mut FacetMesh,
        v: VertexId,
        observer: &mut dyn CollapseObserver,
    ) -> Result<ScanStep> {
        if !is_candidate(mesh, v) {
            return Ok(ScanStep::Advance);
        }
        let Some(end) = find_adjacent(mesh, v, self.selection, self.preserve_boundary) else {
            return Ok(ScanStep::Advance);
        };

        observer.before_merge(mesh, v, end);
        let removed = merge_edge(mesh, v, end)?;
        observer.after_merge(mesh, v, end);

        // a merge that removes nothing would revisit the same vertex forever
        if removed == 0 {
            let message = format!("merging vertex {} into {} removed no facets", end, v);
            error!("{}", message);
            return Err(Error::Topology(message));
        }

        debug!("merged vertex {} into {}, {} facets removed", end, v, removed);
        Ok(ScanStep::Revisit)
    }
}

impl MeshSimplifier for EdgeCollapseSimplifier {
    fn simplify(&self, mesh: &mut FacetMesh) -> Result<SimplifyReport> {
        self.simplify_with_observer(mesh, &mut NoopObserver)
    }
}
