//! Indexed facet mesh
//!
//! `FacetMesh` owns two arenas: facets, appended by a generator, and
//! vertices, materialized by [`FacetMesh::index_mesh`]. Once indexed, every
//! facet names three vertices and every vertex lists the facets that name
//! it. All mutation goes through methods that keep those two views in exact
//! agreement.

use crate::bloom::{point_key, ExhaustiveSearch, PointBloom, PointFilter};
use crate::error::{Error, Result};
use crate::facet::Facet;
use crate::geometry::facet_normal;
use crate::mesh::TriangleMesh;
use crate::point::{same_point, FacetId, Point3f, Vector3f, VertexId, INVALID};
use crate::traits::FacetSink;
use crate::vertex::{Vertex, FACET_CAPACITY};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, error, info};

/// Facets are reserved in blocks of this many entries.
pub const FACET_BLOCK: usize = 1000;

/// Vertices grouped by [`point_key`]. A bucket holds more than one vertex
/// only on a hash collision.
type PointBuckets = FxHashMap<u64, SmallVec<[VertexId; 2]>>;

/// Outcome of [`FacetMesh::add_facet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetInsert {
    Added(FacetId),
    /// The triangle had no area and was not stored.
    Degenerate,
}

impl FacetInsert {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, FacetInsert::Degenerate)
    }
}

/// Outcome of [`FacetMesh::move_facet_vertex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetMove {
    Moved,
    /// The facet lost its area. It must be removed before control returns to
    /// anyone expecting a consistent mesh.
    Degenerate,
}

/// Counters gathered by one indexing run.
///
/// Purely informational; nothing reads them to make decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Points looked up (three per facet).
    pub lookups: usize,
    /// Lookups the filter could not rule out, so existing vertices were
    /// searched.
    pub searches: usize,
    /// Searches that found nothing (filter false positives).
    pub false_positives: usize,
    /// Total vertices compared across all searches.
    pub search_cost: u64,
    /// Vertices created.
    pub vertices: usize,
}

impl IndexStats {
    /// Lookups the filter answered without a linear search.
    pub fn searches_avoided(&self) -> usize {
        self.lookups - self.searches
    }

    pub fn average_search_cost(&self) -> u64 {
        if self.searches == 0 {
            0
        } else {
            self.search_cost / self.searches as u64
        }
    }

    fn log(&self) {
        let percent = |part: usize, whole: usize| if whole == 0 { 0 } else { part * 100 / whole };
        info!(
            "bloom saved {} ({}%) of {} searches",
            self.searches_avoided(),
            percent(self.searches_avoided(), self.lookups),
            self.lookups
        );
        info!(
            "bloom failed to stop {} ({}%) searches out of {}",
            self.false_positives,
            percent(self.false_positives, self.searches),
            self.searches
        );
        info!("average search cost {}", self.average_search_cost());
        info!("final number of vertices indexed {}", self.vertices);
    }
}

/// Triangle mesh with shared vertices and facet back-references.
#[derive(Debug, Default)]
pub struct FacetMesh {
    facets: Vec<Facet>,
    vertices: Vec<Vertex>,
    filter: Option<Box<dyn PointFilter>>,
    /// `None` when indexing runs without a filter: every search is then a
    /// scan of the whole vertex arena.
    buckets: Option<PointBuckets>,
    indexed: bool,
    stats: IndexStats,
    width: u32,
    height: u32,
}

impl FacetMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mesh generated from a raster of `width` x `height` cells.
    ///
    /// The dimensions are only used to lay out debug renderings.
    pub fn with_raster_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn facet(&self, f: FacetId) -> Option<&Facet> {
        self.facets.get(f)
    }

    pub fn vertex(&self, v: VertexId) -> Option<&Vertex> {
        self.vertices.get(v)
    }

    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// Size of the vertex arena, including slots emptied by edge collapses.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertices still referenced by at least one facet.
    pub fn live_vertex_count(&self) -> usize {
        self.vertices.iter().filter(|v| !v.is_isolated()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn raster_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Counters from the most recent [`FacetMesh::index_mesh`].
    pub fn index_stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Add a triangle.
    ///
    /// Triangles without area are dropped and reported as
    /// [`FacetInsert::Degenerate`]. If the mesh has already been indexed the
    /// facet is indexed straight away.
    pub fn add_facet(&mut self, p0: Point3f, p1: Point3f, p2: Point3f) -> Result<FacetInsert> {
        let Some(facet) = Facet::new(p0, p1, p2) else {
            return Ok(FacetInsert::Degenerate);
        };

        if self.facets.len() == self.facets.capacity() {
            self.facets.try_reserve_exact(FACET_BLOCK)?;
        }

        let id = self.facets.len();
        self.facets.push(facet);

        if self.is_indexed() {
            let before = self.vertices.len();
            let stats = self.stats;
            if let Err(e) = self.index_facet(id) {
                // leave no trace of the rejected facet or the points it added
                self.facets.pop();
                self.forget_vertices_from(before);
                self.stats = stats;
                return Err(e);
            }
        }

        Ok(FacetInsert::Added(id))
    }

    /// Build the shared vertex arena.
    ///
    /// `bloom_complexity` sizes the point filter relative to the facet
    /// count, and lookups it cannot rule out search a single hash bucket.
    /// `0` disables both and every lookup falls back to a linear search of
    /// the vertex arena. The indexed result is identical either way.
    pub fn index_mesh(&mut self, bloom_complexity: u32) -> Result<()> {
        self.stats = IndexStats::default();
        self.vertices.clear();
        for facet in &mut self.facets {
            facet.indices = [INVALID; 3];
        }

        if bloom_complexity == 0 {
            self.filter = Some(Box::new(ExhaustiveSearch));
            self.buckets = None;
        } else {
            self.filter = Some(Box::new(PointBloom::with_complexity(
                self.facets.len(),
                bloom_complexity,
            )));
            let mut buckets = PointBuckets::default();
            if let Err(e) = buckets.try_reserve(self.facets.len()) {
                self.reset_index();
                return Err(e.into());
            }
            self.buckets = Some(buckets);
        }
        self.indexed = true;

        for f in 0..self.facets.len() {
            if let Err(e) = self.index_facet(f) {
                self.reset_index();
                return Err(e);
            }
        }

        if let Some(filter) = &self.filter {
            debug!("indexing used {}", filter.describe());
        }
        self.stats.log();

        Ok(())
    }

    fn reset_index(&mut self) {
        self.vertices.clear();
        self.filter = None;
        self.buckets = None;
        self.indexed = false;
        for facet in &mut self.facets {
            facet.indices = [INVALID; 3];
        }
    }

    /// Resolve the three corners of facet `f` and install back-references.
    fn index_facet(&mut self, f: FacetId) -> Result<()> {
        let points = self.facets[f].points;
        let indices = [
            self.add_point(&points[0]),
            self.add_point(&points[1]),
            self.add_point(&points[2]),
        ];

        if let Some(&v) = indices.iter().find(|&&v| !self.vertices[v].has_room()) {
            return Err(Error::VertexCapacity {
                vertex: v,
                capacity: FACET_CAPACITY,
            });
        }

        self.facets[f].indices = indices;
        for v in indices {
            self.vertices[v].attach(f);
        }

        Ok(())
    }

    /// Index of the vertex at `point`, creating it if it does not exist.
    pub fn add_point(&mut self, point: &Point3f) -> VertexId {
        self.stats.lookups += 1;

        let maybe_present = self
            .filter
            .as_ref()
            .map_or(true, |filter| filter.may_contain(point));
        if maybe_present {
            self.stats.searches += 1;
            if let Some(v) = self.find_point(point) {
                return v;
            }
            self.stats.false_positives += 1;
        }

        let v = self.vertices.len();
        self.vertices.push(Vertex::new(*point));
        if let Some(filter) = self.filter.as_mut() {
            filter.insert(point);
        }
        if let Some(buckets) = self.buckets.as_mut() {
            buckets.entry(point_key(point)).or_default().push(v);
        }
        self.stats.vertices = self.vertices.len();
        v
    }

    fn find_point(&mut self, point: &Point3f) -> Option<VertexId> {
        let vertices = &self.vertices;
        let found = match &self.buckets {
            Some(buckets) => {
                let bucket = buckets.get(&point_key(point)).map_or(&[][..], |b| b.as_slice());
                scan(bucket.iter().copied(), |v| same_point(&vertices[v].point, point))
            }
            // newest first: duplicates of a point are usually emitted close together
            None => scan((0..vertices.len()).rev(), |v| same_point(&vertices[v].point, point)),
        };

        let (hit, cost) = found;
        self.stats.search_cost += cost;
        hit
    }

    /// Drop vertices `from..` again, along with their bucket entries.
    ///
    /// Bits they set in a bloom filter stay set; that only costs an extra
    /// search later.
    fn forget_vertices_from(&mut self, from: VertexId) {
        if let Some(buckets) = self.buckets.as_mut() {
            for (v, vertex) in self.vertices.iter().enumerate().skip(from) {
                let key = point_key(&vertex.point);
                if let Some(bucket) = buckets.get_mut(&key) {
                    bucket.retain(|&mut b| b != v);
                    if bucket.is_empty() {
                        buckets.remove(&key);
                    }
                }
            }
        }
        self.vertices.truncate(from);
    }

    /// Remove facet `f`.
    ///
    /// The facet is detached from its three vertices, the last facet is
    /// moved into its slot, and the moved facet's back-references are
    /// rewritten to the new slot. Any facet id other than `f` and the last
    /// one stays valid. Nothing is changed if the references are
    /// inconsistent.
    pub fn remove_facet(&mut self, f: FacetId) -> Result<()> {
        let last = self
            .facets
            .len()
            .checked_sub(1)
            .ok_or_else(|| Error::InvalidData("remove from empty mesh".to_string()))?;
        if f > last {
            return Err(Error::InvalidData(format!(
                "facet {} out of range ({} facets)",
                f,
                self.facets.len()
            )));
        }

        let indices = self.facets[f].indices;
        let moved = self.facets[last].indices;
        for v in indices {
            self.back_reference(f, v)?;
        }
        if f != last {
            for v in moved {
                self.back_reference(last, v)?;
            }
        }

        for v in indices {
            if let Some(pos) = self.vertices[v].position_of(f) {
                self.vertices[v].detach_at(pos);
            }
        }

        self.facets.swap_remove(f);

        if f != last {
            for v in moved {
                let vertex = &mut self.vertices[v];
                if let Some(pos) = vertex.position_of(last) {
                    vertex.detach_at(pos);
                }
                vertex.attach(f);
            }
        }

        Ok(())
    }

    /// Retarget the corner of facet `f` that names `from` so it names `to`.
    ///
    /// The cached point and normal are refreshed. A facet left without area
    /// is reported as [`FacetMove::Degenerate`] and still needs removing.
    pub fn move_facet_vertex(&mut self, f: FacetId, from: VertexId, to: VertexId) -> Result<FacetMove> {
        let facet = self
            .facets
            .get(f)
            .ok_or_else(|| Error::InvalidData(format!("facet {} out of range", f)))?;
        if to >= self.vertices.len() {
            return Err(Error::InvalidData(format!("vertex {} out of range", to)));
        }

        let slot = facet.slot_of(from).ok_or_else(|| {
            topology(format!("vertex {} is not a corner of facet {}", from, f))
        })?;
        if facet.references(to) {
            return Err(topology(format!(
                "facet {} already references vertex {}",
                f, to
            )));
        }
        let pos = self.back_reference(f, from)?;
        if !self.vertices[to].has_room() {
            return Err(Error::VertexCapacity {
                vertex: to,
                capacity: FACET_CAPACITY,
            });
        }

        let point = self.vertices[to].point;
        let facet = &mut self.facets[f];
        facet.indices[slot] = to;
        facet.points[slot] = point;

        self.vertices[to].attach(f);
        self.vertices[from].detach_at(pos);

        let [v0, v1, v2] = &facet.points;
        match facet_normal(v0, v1, v2) {
            Some(n) => {
                facet.normal = n;
                Ok(FacetMove::Moved)
            }
            None => {
                facet.normal = Vector3f::zeros();
                debug!("facet {} became degenerate on vertex move", f);
                Ok(FacetMove::Degenerate)
            }
        }
    }

    /// Position of facet `f` in vertex `v`'s owning list.
    fn back_reference(&self, f: FacetId, v: VertexId) -> Result<usize> {
        self.vertices
            .get(v)
            .and_then(|vertex| vertex.position_of(f))
            .ok_or_else(|| topology(format!("facet {} missing from vertex {}", f, v)))
    }

    /// Compacted copy for exporters.
    ///
    /// Vertex slots left empty by edge collapses are dropped and the face
    /// indices renumbered.
    pub fn to_triangle_mesh(&self) -> TriangleMesh {
        if !self.is_indexed() {
            let mut mesh = TriangleMesh::new();
            for facet in &self.facets {
                let base = mesh.vertices.len();
                mesh.vertices.extend_from_slice(&facet.points);
                mesh.add_face([base, base + 1, base + 2], facet.normal);
            }
            return mesh;
        }

        let mut old_to_new = vec![INVALID; self.vertices.len()];
        let mut mesh = TriangleMesh::new();
        for (i, vertex) in self.vertices.iter().enumerate() {
            if !vertex.is_isolated() {
                old_to_new[i] = mesh.add_vertex(vertex.point);
            }
        }
        for facet in &self.facets {
            let face = facet.indices.map(|v| old_to_new[v]);
            mesh.add_face(face, facet.normal);
        }
        mesh
    }
}

impl FacetSink for FacetMesh {
    fn add_facet(&mut self, p0: Point3f, p1: Point3f, p2: Point3f) -> Result<FacetInsert> {
        FacetMesh::add_facet(self, p0, p1, p2)
    }
}

/// First vertex accepted by `matches`, and how many were compared.
fn scan(
    candidates: impl Iterator<Item = VertexId>,
    mut matches: impl FnMut(VertexId) -> bool,
) -> (Option<VertexId>, u64) {
    let mut cost = 0;
    for v in candidates {
        cost += 1;
        if matches(v) {
            return (Some(v), cost);
        }
    }
    (None, cost)
}

fn topology(message: String) -> Error {
    error!("{}", message);
    Error::Topology(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32, z: f32) -> Point3f {
        Point3f::new(x, y, z)
    }

    /// Two triangles covering the unit square, sharing the 0-1 diagonal.
    fn make_square() -> FacetMesh {
        let mut mesh = FacetMesh::new();
        mesh.add_facet(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)).unwrap();
        mesh.add_facet(p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)).unwrap();
        mesh
    }

    fn make_fan(n: usize) -> FacetMesh {
        let mut mesh = FacetMesh::new();
        for i in 0..n {
            mesh.add_facet(p(0.0, 0.0, 0.0), p(i as f32 + 1.0, 1.0, 0.0), p(i as f32 + 2.0, 1.0, 0.0))
                .unwrap();
        }
        mesh
    }

    fn assert_consistent(mesh: &FacetMesh) {
        for (f, facet) in mesh.facets().iter().enumerate() {
            assert!(facet.has_distinct_indices());
            for (slot, &v) in facet.indices.iter().enumerate() {
                let vertex = mesh.vertex(v).unwrap();
                assert_eq!(vertex.facets().iter().filter(|&&o| o == f).count(), 1);
                assert_eq!(facet.points[slot], vertex.point);
            }
        }
        for (v, vertex) in mesh.vertices().iter().enumerate() {
            for &f in vertex.facets() {
                assert!(mesh.facet(f).unwrap().references(v));
            }
        }
    }

    #[test]
    fn test_add_facet() {
        let mut mesh = FacetMesh::new();
        let added = mesh.add_facet(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(added, FacetInsert::Added(0));
        assert_eq!(mesh.facet_count(), 1);
        assert!(!mesh.is_indexed());
    }

    #[test]
    fn test_degenerate_add_rejected() {
        let mut mesh = make_square();
        let result = mesh.add_facet(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0)).unwrap();
        assert!(result.is_degenerate());
        assert_eq!(mesh.facet_count(), 2);
    }

    #[test]
    fn test_growth_in_blocks() {
        let mut mesh = make_fan(FACET_BLOCK + 1);
        assert_eq!(mesh.facet_count(), FACET_BLOCK + 1);
        assert!(mesh.facets.capacity() >= FACET_BLOCK + 1);
        mesh.facets.clear();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_index_shares_vertices() {
        let mut mesh = make_square();
        mesh.index_mesh(4).unwrap();

        assert!(mesh.is_indexed());
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.vertex(0).unwrap().facet_count(), 2);
        assert_eq!(mesh.vertex(2).unwrap().facet_count(), 2);
        assert_eq!(mesh.facet(1).unwrap().indices, [0, 2, 3]);
        assert_consistent(&mesh);

        let stats = mesh.index_stats();
        assert_eq!(stats.lookups, 6);
        assert_eq!(stats.vertices, 4);
        assert!(stats.searches >= 2);
    }

    #[test]
    fn test_index_without_filter_matches() {
        let mut with_bloom = make_fan(12);
        let mut without = make_fan(12);
        with_bloom.index_mesh(8).unwrap();
        without.index_mesh(0).unwrap();

        assert_eq!(with_bloom.facets(), without.facets());
        assert_eq!(without.index_stats().searches, without.index_stats().lookups);
        assert!(with_bloom.index_stats().searches <= without.index_stats().searches);
    }

    #[test]
    fn test_search_cost_bounded_on_growing_grids() {
        for size in [16, 64, 128] {
            let mut mesh = FacetMesh::new();
            for y in 0..size {
                for x in 0..size {
                    let (x, y) = (x as f32, y as f32);
                    mesh.add_facet(p(x, y, 0.0), p(x + 1.0, y, 0.0), p(x + 1.0, y + 1.0, 0.0)).unwrap();
                    mesh.add_facet(p(x, y, 0.0), p(x + 1.0, y + 1.0, 0.0), p(x, y + 1.0, 0.0)).unwrap();
                }
            }
            mesh.index_mesh(10).unwrap();

            let stats = mesh.index_stats();
            assert_eq!(stats.vertices, (size + 1) * (size + 1));
            assert!(stats.searches > 0);
            assert!(
                stats.average_search_cost() <= 1,
                "grid {}: average search cost {}",
                size,
                stats.average_search_cost()
            );
        }
    }

    #[test]
    fn test_reindex_resets_stats() {
        let mut mesh = make_square();
        mesh.index_mesh(4).unwrap();
        mesh.index_mesh(4).unwrap();
        assert_eq!(mesh.index_stats().lookups, 6);
        assert_eq!(mesh.vertex_count(), 4);
        assert_consistent(&mesh);
    }

    #[test]
    fn test_index_capacity_overflow_rolls_back() {
        let mut mesh = make_fan(FACET_CAPACITY + 1);
        let err = mesh.index_mesh(4).unwrap_err();
        assert!(matches!(err, Error::VertexCapacity { vertex: 0, .. }));
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.vertex_count(), 0);
        assert!(mesh.facets().iter().all(|f| !f.is_indexed()));
    }

    #[test]
    fn test_add_after_index_is_indexed() {
        let mut mesh = make_square();
        mesh.index_mesh(4).unwrap();
        let added = mesh.add_facet(p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(1.0, 1.0, 0.0)).unwrap();
        assert_eq!(added, FacetInsert::Added(2));
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.facet(2).unwrap().indices, [1, 4, 2]);
        assert_consistent(&mesh);
    }

    #[test]
    fn test_rejected_add_leaves_no_trace() {
        let mut mesh = make_fan(FACET_CAPACITY);
        mesh.index_mesh(4).unwrap();
        let stats = *mesh.index_stats();
        let vertices = mesh.vertex_count();

        // vertex 0 is full; the two new corners must be forgotten again
        let err = mesh.add_facet(p(0.0, 0.0, 0.0), p(100.0, 1.0, 0.0), p(101.0, 1.0, 0.0));
        assert!(matches!(err, Err(Error::VertexCapacity { vertex: 0, .. })));
        assert_eq!(mesh.index_stats(), &stats);
        assert_eq!(mesh.vertex_count(), vertices);
        assert_eq!(mesh.facet_count(), FACET_CAPACITY);

        let added = mesh.add_facet(p(100.0, 1.0, 0.0), p(101.0, 1.0, 0.0), p(100.0, 2.0, 0.0)).unwrap();
        assert_eq!(added, FacetInsert::Added(FACET_CAPACITY));
        assert_eq!(mesh.facet(FACET_CAPACITY).unwrap().indices, [vertices, vertices + 1, vertices + 2]);
        assert_consistent(&mesh);
    }

    #[test]
    fn test_remove_last_facet() {
        let mut mesh = make_square();
        mesh.index_mesh(4).unwrap();
        mesh.remove_facet(1).unwrap();
        assert_eq!(mesh.facet_count(), 1);
        assert!(mesh.vertex(3).unwrap().is_isolated());
        assert_consistent(&mesh);
    }

    #[test]
    fn test_remove_patches_moved_facet() {
        let mut mesh = make_fan(4);
        mesh.index_mesh(4).unwrap();
        let moved = *mesh.facet(3).unwrap();

        mesh.remove_facet(0).unwrap();

        assert_eq!(mesh.facet_count(), 3);
        assert_eq!(mesh.facet(0).unwrap(), &moved);
        for v in moved.indices {
            assert!(mesh.vertex(v).unwrap().owns(0));
            assert!(!mesh.vertex(v).unwrap().owns(3));
        }
        assert_consistent(&mesh);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut mesh = make_square();
        mesh.index_mesh(4).unwrap();
        assert!(matches!(mesh.remove_facet(2), Err(Error::InvalidData(_))));
        assert_eq!(mesh.facet_count(), 2);
    }

    #[test]
    fn test_remove_unindexed_is_topology_error() {
        let mut mesh = make_square();
        assert!(matches!(mesh.remove_facet(0), Err(Error::Topology(_))));
        assert_eq!(mesh.facet_count(), 2);
    }

    #[test]
    fn test_move_facet_vertex() {
        let mut mesh = make_square();
        mesh.add_facet(p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(1.0, 1.0, 0.0)).unwrap();
        mesh.index_mesh(4).unwrap();
        // vertex 4 is (2,0,0), vertex 3 is (0,1,0)
        let moved = mesh.move_facet_vertex(2, 4, 3).unwrap();

        assert_eq!(moved, FacetMove::Moved);
        let facet = mesh.facet(2).unwrap();
        assert_eq!(facet.indices, [1, 3, 2]);
        assert_eq!(facet.points[1], p(0.0, 1.0, 0.0));
        assert_eq!(facet.normal, Vector3f::new(0.0, 0.0, -1.0));
        assert!(mesh.vertex(4).unwrap().is_isolated());
        assert_consistent(&mesh);
    }

    #[test]
    fn test_move_reports_degenerate() {
        let mut mesh = FacetMesh::new();
        mesh.add_facet(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(0.0, 1.0, 0.0)).unwrap();
        mesh.add_facet(p(1.0, 0.0, 0.0), p(1.0, -1.0, 0.0), p(2.0, -1.0, 0.0)).unwrap();
        mesh.index_mesh(0).unwrap();
        // facet 0 corner (0,1,0) onto (1,0,0): collinear along the x axis
        let moved = mesh.move_facet_vertex(0, 2, 3).unwrap();
        assert_eq!(moved, FacetMove::Degenerate);
        assert_eq!(mesh.facet(0).unwrap().normal, Vector3f::zeros());
        mesh.remove_facet(0).unwrap();
        assert_consistent(&mesh);
    }

    #[test]
    fn test_move_from_missing_vertex_fails_cleanly() {
        let mut mesh = make_square();
        mesh.index_mesh(4).unwrap();
        let before = *mesh.facet(0).unwrap();
        assert!(matches!(mesh.move_facet_vertex(0, 3, 1), Err(Error::Topology(_))));
        assert!(matches!(mesh.move_facet_vertex(0, 1, 2), Err(Error::Topology(_))));
        assert_eq!(mesh.facet(0).unwrap(), &before);
        assert_consistent(&mesh);
    }

    #[test]
    fn test_to_triangle_mesh_drops_isolated_vertices() {
        let mut mesh = make_square();
        mesh.index_mesh(4).unwrap();
        mesh.remove_facet(1).unwrap();

        let out = mesh.to_triangle_mesh();
        assert_eq!(out.vertex_count(), 3);
        assert_eq!(out.face_count(), 1);
        assert_eq!(out.faces[0], [0, 1, 2]);
        assert_eq!(out.face_normals[0], Vector3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_to_triangle_mesh_unindexed() {
        let mesh = make_square();
        let out = mesh.to_triangle_mesh();
        assert_eq!(out.vertex_count(), 6);
        assert_eq!(out.faces[1], [3, 4, 5]);
    }

    #[test]
    fn test_raster_size() {
        let mesh = FacetMesh::with_raster_size(64, 32);
        assert_eq!(mesh.raster_size(), (64, 32));
        assert!(mesh.is_empty());
    }
}
