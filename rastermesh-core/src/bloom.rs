//! Approximate point membership used to shortcut vertex deduplication
//!
//! A filter only answers "might this point already be a vertex". A `false`
//! answer must be exact, a `true` answer is confirmed by a linear search of
//! the vertex arena, so a filter can only ever change how fast indexing runs.

use crate::point::Point3f;
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::Hasher;

/// Upper bound on bit probes per key.
pub const MAX_PROBES: u32 = 32;

/// Approximate membership over points already turned into vertices.
pub trait PointFilter: fmt::Debug {
    /// `false` only if `point` was never inserted.
    fn may_contain(&self, point: &Point3f) -> bool;

    /// Record `point` as present.
    fn insert(&mut self, point: &Point3f);

    /// One line summary for log output.
    fn describe(&self) -> String;
}

/// Filter that never rules anything out, forcing a linear search for every
/// point.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustiveSearch;

impl PointFilter for ExhaustiveSearch {
    fn may_contain(&self, _point: &Point3f) -> bool {
        true
    }

    fn insert(&mut self, _point: &Point3f) {}

    fn describe(&self) -> String {
        "exhaustive search".to_string()
    }
}

/// Bloom filter keyed on the bit patterns of a point's coordinates.
#[derive(Clone)]
pub struct PointBloom {
    words: Vec<u64>,
    probes: u32,
    inserted: usize,
}

impl PointBloom {
    /// Bloom filter with `words` 64-bit words and `probes` bits set per key.
    pub fn new(words: usize, probes: u32) -> Self {
        Self {
            words: vec![0; words.max(1)],
            probes: probes.clamp(1, MAX_PROBES),
            inserted: 0,
        }
    }

    /// Size a filter for a mesh of `facet_count` facets.
    ///
    /// Larger `complexity` values trade memory for fewer false positives.
    pub fn with_complexity(facet_count: usize, complexity: u32) -> Self {
        let complexity = complexity.max(1);
        Self::new(
            facet_count.saturating_mul(complexity as usize),
            complexity.saturating_mul(4),
        )
    }

    pub fn bit_count(&self) -> usize {
        self.words.len() * 64
    }

    pub fn probes(&self) -> u32 {
        self.probes
    }

    /// Number of keys inserted so far.
    pub fn len(&self) -> usize {
        self.inserted
    }

    pub fn is_empty(&self) -> bool {
        self.inserted == 0
    }

    /// Fraction of bits set.
    pub fn fill_ratio(&self) -> f64 {
        let set: u32 = self.words.iter().map(|w| w.count_ones()).sum();
        set as f64 / self.bit_count() as f64
    }

    fn bit_indices(&self, point: &Point3f) -> impl Iterator<Item = usize> {
        let (h1, h2) = key_hashes(point);
        let bits = self.bit_count() as u64;
        (0..self.probes as u64).map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) % bits) as usize)
    }
}

impl PointFilter for PointBloom {
    fn may_contain(&self, point: &Point3f) -> bool {
        self.bit_indices(point)
            .all(|bit| self.words[bit / 64] & (1 << (bit % 64)) != 0)
    }

    fn insert(&mut self, point: &Point3f) {
        let bits: Vec<usize> = self.bit_indices(point).collect();
        for bit in bits {
            self.words[bit / 64] |= 1 << (bit % 64);
        }
        self.inserted += 1;
    }

    fn describe(&self) -> String {
        format!(
            "bloom filter of {} bits, {} probes, {:.1}% full",
            self.bit_count(),
            self.probes,
            self.fill_ratio() * 100.0
        )
    }
}

impl fmt::Debug for PointBloom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointBloom")
            .field("bits", &self.bit_count())
            .field("probes", &self.probes)
            .field("inserted", &self.inserted)
            .finish()
    }
}

/// Bucket key for exact point lookup. Equal points always share a key.
pub(crate) fn point_key(point: &Point3f) -> u64 {
    key_hashes(point).0
}

/// Two independent hashes for double hashing.
///
/// `-0.0` is folded into `0.0` first: the two compare equal, so they must
/// land on the same bits.
fn key_hashes(point: &Point3f) -> (u64, u64) {
    let mut hasher = FxHasher::default();
    for c in [point.x, point.y, point.z] {
        hasher.write_u32((c + 0.0).to_bits());
    }
    let h1 = fmix64(hasher.finish());
    let h2 = fmix64(h1 ^ 0x9e37_79b9_7f4a_7c15) | 1;
    (h1, h2)
}

// murmur3 finalizer
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}
