//! Unique mesh vertices and their owning facets

use crate::point::{FacetId, Point3f};
use smallvec::SmallVec;

/// Maximum number of facets a single vertex may be shared by.
pub const FACET_CAPACITY: usize = 32;

/// A unique point plus every facet that currently references it.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub point: Point3f,
    facets: SmallVec<[FacetId; 8]>,
}

impl Vertex {
    pub fn new(point: Point3f) -> Self {
        Self {
            point,
            facets: SmallVec::new(),
        }
    }

    /// Owning facets, in the order they were attached.
    #[inline]
    pub fn facets(&self) -> &[FacetId] {
        &self.facets
    }

    #[inline]
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// A vertex left behind by an edge collapse owns no facets.
    #[inline]
    pub fn is_isolated(&self) -> bool {
        self.facets.is_empty()
    }

    #[inline]
    pub fn has_room(&self) -> bool {
        self.facets.len() < FACET_CAPACITY
    }

    #[inline]
    pub fn owns(&self, facet: FacetId) -> bool {
        self.facets.contains(&facet)
    }

    pub(crate) fn position_of(&self, facet: FacetId) -> Option<usize> {
        self.facets.iter().position(|&f| f == facet)
    }

    /// Append `facet`. The caller has already checked [`Vertex::has_room`].
    pub(crate) fn attach(&mut self, facet: FacetId) {
        debug_assert!(self.has_room());
        self.facets.push(facet);
    }

    /// Remove the entry at `pos`, keeping the order of the others.
    pub(crate) fn detach_at(&mut self, pos: usize) {
        self.facets.remove(pos);
    }
}
