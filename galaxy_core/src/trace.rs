//! Bounded frontier expansion over jump edges.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    jumps::{JumpEdge, JumpGraph},
    stellar::StarId,
};

/// Edges reachable from a start star, in the order they were discovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    pub start: StarId,
    pub edges: Vec<JumpEdge>,
    /// Expansion rounds performed, including a final round that found nothing.
    pub iterations: usize,
    /// False when the iteration bound stopped expansion with a frontier left.
    pub exhausted: bool,
}

impl TraceResult {
    pub fn reach(&self) -> usize {
        self.edges.len()
    }

    /// Start star first, then each edge's endpoints in discovery order, without repeats.
    pub fn stars_in_order(&self) -> Vec<StarId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let endpoints = self.edges.iter().flat_map(|edge| [edge.from, edge.to]);
        for star in std::iter::once(self.start).chain(endpoints) {
            if seen.insert(star) {
                order.push(star);
            }
        }
        order
    }
}

/// Expands from `start` until the frontier empties or `max_iterations` rounds ran.
pub fn trace_from(graph: &JumpGraph, start: StarId, max_iterations: usize) -> TraceResult {
    let mut visited: Vec<JumpEdge> = graph.adjacent(start).to_vec();
    let mut seen: HashSet<(StarId, StarId)> = visited.iter().map(JumpEdge::key).collect();
    let mut frontier_start = 0;
    let mut iterations = 0;
    let mut exhausted = visited.is_empty();

    while !exhausted && iterations < max_iterations {
        iterations += 1;
        let frontier_end = visited.len();
        let mut discovered = Vec::new();
        for edge in &visited[frontier_start..frontier_end] {
            for endpoint in [edge.from, edge.to] {
                for next in graph.adjacent(endpoint) {
                    if seen.insert(next.key()) {
                        discovered.push(*next);
                    }
                }
            }
        }
        exhausted = discovered.is_empty();
        visited.extend(discovered);
        frontier_start = frontier_end;
    }

    TraceResult {
        start,
        edges: visited,
        iterations,
        exhausted,
    }
}

/// Star with the largest trace; the lowest id wins ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestConnected {
    pub star: StarId,
    pub trace: TraceResult,
}

pub fn find_best_connected(graph: &JumpGraph, max_iterations: usize) -> Option<BestConnected> {
    let reaches: Vec<usize> = (0..graph.star_count())
        .into_par_iter()
        .map(|star| trace_from(graph, star, max_iterations).reach())
        .collect();

    let mut best: Option<(StarId, usize)> = None;
    for (star, reach) in reaches.into_iter().enumerate() {
        if best.map_or(true, |(_, top)| reach > top) {
            best = Some((star, reach));
        }
    }

    let (star, reach) = best?;
    tracing::debug!(
        target: "galaxy3d::trace",
        star,
        reach,
        "trace.best_connected"
    );
    Some(BestConnected {
        star,
        trace: trace_from(graph, star, max_iterations),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::JumpConfig,
        space::Position,
        stellar::{Star, StellarClass},
    };

    // One light-year spacing is ~0.31 pc; the threshold only admits direct neighbours.
    fn chain_config() -> JumpConfig {
        JumpConfig {
            close_threshold_parsecs: 0.35,
            ..JumpConfig::default()
        }
    }

    fn chain(len: usize, offset: f32) -> Vec<Star> {
        (0..len)
            .map(|i| Star::at(i, StellarClass::M, Position::new(offset + i as f32, 0.0, 0.0)))
            .collect()
    }

    fn two_chains() -> JumpGraph {
        let mut stars = chain(4, 0.0);
        for (i, star) in chain(2, 100.0).into_iter().enumerate() {
            stars.push(Star { id: 4 + i, ..star });
        }
        JumpGraph::build(&stars, &chain_config())
    }

    #[test]
    fn trace_walks_whole_chain() {
        let graph = two_chains();
        let trace = trace_from(&graph, 0, 48);
        let keys: Vec<_> = trace.edges.iter().map(JumpEdge::key).collect();
        assert_eq!(keys, vec![(0, 1), (1, 2), (2, 3)]);
        assert!(trace.exhausted);
        assert_eq!(trace.iterations, 3);
        assert_eq!(trace.stars_in_order(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn trace_from_middle_reaches_same_edges() {
        let graph = two_chains();
        let mut from_start: Vec<_> = trace_from(&graph, 0, 48)
            .edges
            .iter()
            .map(JumpEdge::key)
            .collect();
        from_start.sort();
        for star in 1..4 {
            let mut keys: Vec<_> = trace_from(&graph, star, 48)
                .edges
                .iter()
                .map(JumpEdge::key)
                .collect();
            keys.sort();
            assert_eq!(keys, from_start);
        }
    }

    #[test]
    fn isolated_star_traces_nothing() {
        let stars = vec![
            Star::at(0, StellarClass::M, Position::new(0.0, 0.0, 0.0)),
            Star::at(1, StellarClass::M, Position::new(50.0, 0.0, 0.0)),
        ];
        let graph = JumpGraph::build(&stars, &JumpConfig::default());
        let trace = trace_from(&graph, 0, 48);
        assert!(trace.edges.is_empty());
        assert_eq!(trace.iterations, 0);
        assert_eq!(trace.stars_in_order(), vec![0]);
    }

    #[test]
    fn iteration_bound_stops_long_chains() {
        let graph = JumpGraph::build(&chain(60, 0.0), &chain_config());
        let trace = trace_from(&graph, 0, 48);
        assert_eq!(trace.iterations, 48);
        assert!(!trace.exhausted);
        assert_eq!(trace.reach(), 49);
    }

    #[test]
    fn edges_are_never_revisited() {
        let graph = two_chains();
        for star in 0..graph.star_count() {
            let trace = trace_from(&graph, star, 48);
            let unique: HashSet<_> = trace.edges.iter().map(JumpEdge::key).collect();
            assert_eq!(unique.len(), trace.edges.len());
        }
    }

    #[test]
    fn best_connected_prefers_larger_component_and_lowest_id() {
        let graph = two_chains();
        let best = find_best_connected(&graph, 48).expect("catalog is not empty");
        assert_eq!(best.star, 0);
        assert_eq!(best.trace.reach(), 3);
    }

    #[test]
    fn empty_graph_has_no_best() {
        let graph = JumpGraph::build(&[], &JumpConfig::default());
        assert!(find_best_connected(&graph, 48).is_none());
    }
}
