//! Ordering keys shared by the frontier structure, the base case and the
//! recursive driver.
//!
//! Distances are snapped to a `1e-10` grid before they take part in any
//! ordering decision, so repeated runs over the same input always agree on
//! which of two accumulated sums is smaller. Equal distances are broken by
//! the hop count of the path that produced them and then by vertex id.
//!
//! The hop count keeps the order consistent along zero-weight edges: the
//! head of an edge always sorts strictly after its tail, whatever their ids.

use std::cmp::Ordering;

use serde::Serialize;

use crate::graph::VertexId;

/// Scale of the rounding grid applied to every compared distance.
pub const DISTANCE_SCALE: f64 = 1e10;

/// Snap `distance` to the comparison grid. Infinity is preserved.
#[inline]
pub fn round_distance(distance: f64) -> f64 {
    if distance.is_finite() {
        (distance * DISTANCE_SCALE).round() / DISTANCE_SCALE
    } else {
        distance
    }
}

/// A vertex together with a (rounded) tentative distance and the number of
/// edges on the path that produced it.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct WeightedPair {
    pub vertex: VertexId,
    pub distance: f64,
    pub hops: u32,
}

impl WeightedPair {
    /// A pair with hop count zero.
    #[inline]
    pub fn new(vertex: VertexId, distance: f64) -> Self {
        Self::with_hops(vertex, distance, 0)
    }

    #[inline]
    pub fn with_hops(vertex: VertexId, distance: f64, hops: u32) -> Self {
        Self { vertex, distance: round_distance(distance), hops }
    }

    /// The pair's position in the global `(distance, hops, vertex)` order.
    #[inline]
    pub fn key(&self) -> Bound {
        Bound { distance: self.distance, hops: self.hops, vertex: self.vertex }
    }
}

impl PartialEq for WeightedPair {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for WeightedPair {}

impl Ord for WeightedPair {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
impl PartialOrd for WeightedPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A separating key in the same `(distance, hops, vertex)` order as
/// [`WeightedPair`].
///
/// Bounds are keys rather than bare distances so that `pull` can always hand
/// out a strict separator, even when several frontier entries share a
/// distance.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Bound {
    distance: f64,
    hops: u32,
    vertex: VertexId,
}

impl Bound {
    /// Admits every finite pair.
    pub const INFINITE: Bound =
        Bound { distance: f64::INFINITY, hops: u32::MAX, vertex: VertexId::MAX };

    /// A bound at hop count zero: it admits `distance` only below `vertex`
    /// among zero-hop pairs, and no pair with a positive hop count.
    #[inline]
    pub fn new(distance: f64, vertex: VertexId) -> Self {
        Self { distance: round_distance(distance), hops: 0, vertex }
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn hops(&self) -> u32 {
        self.hops
    }

    /// `true` when `pair` sorts strictly below this bound.
    #[inline]
    pub fn admits(&self, pair: &WeightedPair) -> bool {
        pair.key() < *self
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        *self == Self::INFINITE
    }
}

impl PartialEq for Bound {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Bound {}

impl Ord for Bound {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.hops.cmp(&other.hops))
            .then(self.vertex.cmp(&other.vertex))
    }
}
impl PartialOrd for Bound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
