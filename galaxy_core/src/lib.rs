//! Procedural starfield core for the Galaxy3D viewer.
//!
//! Generates a deterministic star catalog from a seed, derives a main world for
//! each star on demand, links nearby stars into a banded jump graph and finds
//! the best-connected star. Rendering, windowing and input belong to the host;
//! this crate hands it [`RenderScene`] primitives and answers selection queries.

pub mod catalog;
pub mod color;
pub mod config;
pub mod hashing;
pub mod jumps;
pub mod metrics;
pub mod render;
pub mod report;
pub mod selection;
pub mod space;
pub mod stellar;
pub mod trace;
pub mod world;

pub use catalog::{BuildOutcome, GalaxyCatalog};
pub use color::Rgba;
pub use config::{
    GalaxyConfig, GalaxyConfigError, GenerationConfig, JumpBand, JumpConfig, TraceConfig,
    BUILTIN_GALAXY_CONFIG, PARSECS_PER_LIGHT_YEAR,
};
pub use hashing::{hash_coordinates, FnvHasher, GalaxyRng};
pub use jumps::{ClosestN, JumpEdge, JumpGraph};
pub use metrics::CatalogMetrics;
pub use render::{edge_thickness, JumpLine, RenderScene, RenderSink, StarPoint};
pub use report::{JumpSummary, ReportError, TravelReport, TravelRow, CSV_HEADER};
pub use selection::{
    AttributeQuery, Comparison, Direction, Selection, Selector, StarFilter, UnknownFilter,
    WorldAttribute,
};
pub use space::{CellRegion, Position, SpatialCell};
pub use stellar::{ClassDetails, Star, StarFieldGenerator, StarId, StellarClass};
pub use trace::{find_best_connected, trace_from, BestConnected, TraceResult};
pub use world::{Atmosphere, AtmosphereTraits, Starport, TechLevel, World, WorldGenerator};
