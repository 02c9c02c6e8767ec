use serde::{Deserialize, Serialize};

use crate::{
    catalog::GalaxyCatalog,
    stellar::{StarId, StellarClass},
};

/// Summary numbers for a built catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMetrics {
    pub stars: usize,
    /// Counts in O, B, A, F, G, K, M order.
    pub class_counts: [usize; 7],
    pub edges: usize,
    pub connected_edges: usize,
    pub isolated_stars: usize,
    pub best_connected: Option<StarId>,
    pub best_reach: usize,
}

impl CatalogMetrics {
    pub fn collect(catalog: &GalaxyCatalog) -> Self {
        let mut class_counts = [0usize; 7];
        for star in catalog.stars() {
            class_counts[class_index(star.class)] += 1;
        }
        let graph = catalog.graph();
        let best = catalog.best_connected();
        let metrics = Self {
            stars: catalog.stars().len(),
            class_counts,
            edges: graph.edges().len(),
            connected_edges: graph.connected_edge_count(),
            isolated_stars: graph.isolated_stars(),
            best_connected: best.as_ref().map(|best| best.star),
            best_reach: best.map_or(0, |best| best.trace.reach()),
        };
        tracing::info!(
            target: "galaxy3d::catalog",
            stars = metrics.stars,
            edges = metrics.edges,
            connected = metrics.connected_edges,
            isolated = metrics.isolated_stars,
            best = ?metrics.best_connected,
            reach = metrics.best_reach,
            "catalog.metrics"
        );
        metrics
    }

    pub fn class_count(&self, class: StellarClass) -> usize {
        self.class_counts[class_index(class)]
    }
}

fn class_index(class: StellarClass) -> usize {
    class as usize
}
