//! Distance-banded jump routes between stars.
//!
//! Every star keeps only its `max_neighbors` closest in-range candidates. The
//! union of those picks, deduplicated by endpoint pair, is the edge list used for
//! rendering. Edges shorter than the close threshold are also registered under
//! both endpoints in the adjacency used by the tracer.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    color::Rgba,
    config::JumpConfig,
    space::Position,
    stellar::{Star, StarId},
};

/// Undirected jump; endpoints are stored with `from < to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpEdge {
    pub from: StarId,
    pub to: StarId,
    pub parsecs: f32,
    pub band: usize,
    pub color: Rgba,
}

impl JumpEdge {
    pub fn new(a: StarId, b: StarId, parsecs: f32, band: usize, color: Rgba) -> Self {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        Self {
            from,
            to,
            parsecs,
            band,
            color,
        }
    }

    /// Order-independent identity of the relation.
    pub fn key(&self) -> (StarId, StarId) {
        (self.from, self.to)
    }

    pub fn touches(&self, star: StarId) -> bool {
        self.from == star || self.to == star
    }

    pub fn other_end(&self, star: StarId) -> Option<StarId> {
        if self.from == star {
            Some(self.to)
        } else if self.to == star {
            Some(self.from)
        } else {
            None
        }
    }
}

/// Candidate edge between two stars, or `None` when they are too far apart.
pub fn candidate(a: &Star, b: &Star, config: &JumpConfig) -> Option<JumpEdge> {
    link((a.id, a.position), (b.id, b.position), config)
}

fn link(
    (a, from): (StarId, Position),
    (b, to): (StarId, Position),
    config: &JumpConfig,
) -> Option<JumpEdge> {
    if a == b {
        return None;
    }
    let parsecs = from.distance(to) * config.parsecs_per_unit;
    let band = config.band_for(parsecs)?;
    Some(JumpEdge::new(a, b, parsecs, band, config.bands[band].color))
}

/// Fixed-size rolling selection of the closest edges seen so far.
///
/// A newcomer takes a rank only when strictly closer than its holder, so the
/// first edge to reach a rank keeps it on ties.
#[derive(Debug, Clone)]
pub struct ClosestN {
    slots: Vec<Option<JumpEdge>>,
}

impl ClosestN {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn offer(&mut self, edge: JumpEdge) -> bool {
        let rank = self.slots.iter().position(|slot| match slot {
            None => true,
            Some(held) => edge.parsecs < held.parsecs,
        });
        let Some(rank) = rank else {
            return false;
        };
        self.slots.insert(rank, Some(edge));
        self.slots.pop();
        true
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_edges(self) -> Vec<JumpEdge> {
        self.slots.into_iter().flatten().collect()
    }
}

/// The retained candidates for `stars[index]`, closest first. Endpoints are
/// slice positions, not `Star::id`.
pub fn nearest_jumps(stars: &[Star], index: usize, config: &JumpConfig) -> Vec<JumpEdge> {
    let Some(origin) = stars.get(index) else {
        return Vec::new();
    };
    let mut closest = ClosestN::new(config.max_neighbors);
    for (other_index, other) in stars.iter().enumerate() {
        if other_index == index {
            continue;
        }
        if let Some(edge) = link(
            (index, origin.position),
            (other_index, other.position),
            config,
        ) {
            closest.offer(edge);
        }
    }
    closest.into_edges()
}

/// Read-only jump graph over a dense star catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpGraph {
    edges: Vec<JumpEdge>,
    adjacency: Vec<Vec<JumpEdge>>,
    candidates: Vec<Vec<JumpEdge>>,
    close_threshold: f32,
}

impl JumpGraph {
    /// Builds the graph. Stars are addressed by slice position; a catalog keeps
    /// `stars[i].id == i`, so the two agree there.
    pub fn build(stars: &[Star], config: &JumpConfig) -> Self {
        let candidates: Vec<Vec<JumpEdge>> = (0..stars.len())
            .into_par_iter()
            .map(|index| nearest_jumps(stars, index, config))
            .collect();

        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        let mut adjacency = vec![Vec::new(); stars.len()];
        for edge in candidates.iter().flatten() {
            if !seen.insert(edge.key()) {
                continue;
            }
            edges.push(*edge);
            if edge.parsecs < config.close_threshold_parsecs {
                adjacency[edge.from].push(*edge);
                adjacency[edge.to].push(*edge);
            }
        }

        let connected = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
        let isolated = adjacency.iter().filter(|list| list.is_empty()).count();
        tracing::debug!(
            target: "galaxy3d::jumps",
            stars = stars.len(),
            edges = edges.len(),
            connected,
            isolated,
            "jumps.graph.built"
        );

        Self {
            edges,
            adjacency,
            candidates,
            close_threshold: config.close_threshold_parsecs,
        }
    }

    /// Every retained edge, once, in registration order.
    pub fn edges(&self) -> &[JumpEdge] {
        &self.edges
    }

    /// Edges under the close threshold that touch `star`; empty for unknown ids.
    pub fn adjacent(&self, star: StarId) -> &[JumpEdge] {
        self.adjacency.get(star).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The star's own nearest-neighbour picks, before symmetric registration.
    pub fn candidates(&self, star: StarId) -> &[JumpEdge] {
        self.candidates.get(star).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Neighbouring stars reachable in one jump, with the jump length.
    pub fn jump_targets(&self, star: StarId) -> Vec<(StarId, f32)> {
        self.adjacent(star)
            .iter()
            .filter_map(|edge| edge.other_end(star).map(|other| (other, edge.parsecs)))
            .collect()
    }

    pub fn close_threshold(&self) -> f32 {
        self.close_threshold
    }

    pub fn star_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn connected_edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn isolated_stars(&self) -> usize {
        self.adjacency.iter().filter(|list| list.is_empty()).count()
    }
}
