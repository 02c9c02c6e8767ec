//! Owns the generated stars and their jump graph.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    config::GalaxyConfig,
    jumps::JumpGraph,
    report::TravelReport,
    stellar::{Star, StarFieldGenerator, StarId},
    trace::{find_best_connected, trace_from, BestConnected, TraceResult},
    world::{World, WorldGenerator},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildOutcome {
    Built { stars: usize, edges: usize },
    AlreadyBuilt,
}

/// Star catalog plus derived jump graph. Built at most once.
#[derive(Debug, Clone)]
pub struct GalaxyCatalog {
    config: Arc<GalaxyConfig>,
    stars: Vec<Star>,
    graph: JumpGraph,
    generate: bool,
    built: bool,
}

impl GalaxyCatalog {
    /// Empty catalog; [`GalaxyCatalog::build`] generates the configured region.
    pub fn new(config: impl Into<Arc<GalaxyConfig>>) -> Self {
        Self {
            config: config.into(),
            stars: Vec::new(),
            graph: JumpGraph::default(),
            generate: true,
            built: false,
        }
    }

    /// Catalog over caller-supplied stars. Ids are reassigned to match positions.
    pub fn with_stars(config: impl Into<Arc<GalaxyConfig>>, stars: Vec<Star>) -> Self {
        let stars = stars
            .into_iter()
            .enumerate()
            .map(|(id, star)| Star { id, ..star })
            .collect();
        Self {
            config: config.into(),
            stars,
            graph: JumpGraph::default(),
            generate: false,
            built: false,
        }
    }

    /// Generates the configured region unless stars were supplied, then builds
    /// the jump graph.
    pub fn build(&mut self) -> BuildOutcome {
        if self.built {
            tracing::debug!(target: "galaxy3d::catalog", "catalog.build.skipped");
            return BuildOutcome::AlreadyBuilt;
        }
        if self.generate {
            let mut generator = StarFieldGenerator::new(&self.config);
            self.stars = generator.generate_region(&self.config.region);
        }
        self.graph = JumpGraph::build(&self.stars, &self.config.jumps);
        self.built = true;

        let outcome = BuildOutcome::Built {
            stars: self.stars.len(),
            edges: self.graph.edges().len(),
        };
        tracing::info!(
            target: "galaxy3d::catalog",
            seed = self.config.seed,
            stars = self.stars.len(),
            edges = self.graph.edges().len(),
            connected = self.graph.connected_edge_count(),
            "catalog.built"
        );
        outcome
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn star(&self, id: StarId) -> Option<&Star> {
        self.stars.get(id)
    }

    pub fn graph(&self) -> &JumpGraph {
        &self.graph
    }

    pub fn world_generator(&self) -> WorldGenerator {
        WorldGenerator::new(&self.config)
    }

    pub fn world(&self, id: StarId) -> Option<World> {
        self.star(id).map(|star| self.world_generator().world_for(star))
    }

    pub fn trace(&self, start: StarId) -> Option<TraceResult> {
        self.star(start)?;
        Some(trace_from(&self.graph, start, self.config.trace.max_iterations))
    }

    pub fn best_connected(&self) -> Option<BestConnected> {
        find_best_connected(&self.graph, self.config.trace.max_iterations)
    }

    /// Report over the best-connected star's reach; `None` for an empty catalog.
    pub fn travel_report(&self) -> Option<TravelReport> {
        let best = self.best_connected()?;
        Some(TravelReport::build(self, &best.trace))
    }
}
