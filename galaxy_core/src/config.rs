//! Tunables for star generation, jump banding and tracing.
//!
//! A builtin copy is embedded from `data/galaxy_config.json`; hosts may load an
//! override file with [`GalaxyConfig::from_file`].

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{color::Rgba, space::CellRegion};

pub const BUILTIN_GALAXY_CONFIG: &str = include_str!("data/galaxy_config.json");

/// Parsecs in one light-year; one distance unit is one light-year.
pub const PARSECS_PER_LIGHT_YEAR: f32 = 0.306601;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    pub seed: u64,
    pub generation: GenerationConfig,
    pub region: CellRegion,
    pub jumps: JumpConfig,
    pub trace: TraceConfig,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            generation: GenerationConfig::default(),
            region: CellRegion::default(),
            jumps: JumpConfig::default(),
            trace: TraceConfig::default(),
        }
    }
}

impl GalaxyConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_GALAXY_CONFIG)
                .expect("builtin galaxy config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, GalaxyConfigError> {
        let config: GalaxyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, GalaxyConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| GalaxyConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), GalaxyConfigError> {
        let invalid = |reason: &str| {
            Err(GalaxyConfigError::Invalid {
                reason: reason.to_string(),
            })
        };
        if !(self.generation.density_scale > 0.0) {
            return invalid("generation.density_scale must be positive");
        }
        if !(self.generation.cell_span_light_years > 0.0) {
            return invalid("generation.cell_span_light_years must be positive");
        }
        if !(self.jumps.parsecs_per_unit > 0.0) {
            return invalid("jumps.parsecs_per_unit must be positive");
        }
        if self.jumps.max_neighbors == 0 {
            return invalid("jumps.max_neighbors must be at least 1");
        }
        if !(self.jumps.close_threshold_parsecs > 0.0) {
            return invalid("jumps.close_threshold_parsecs must be positive");
        }
        if self.jumps.bands.is_empty() {
            return invalid("jumps.bands must list at least one band");
        }
        if self.trace.max_iterations == 0 {
            return invalid("trace.max_iterations must be at least 1");
        }
        Ok(())
    }
}

/// Star-field density and scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Multiplier applied to each class's odds when drawing a per-cell count.
    pub density_scale: f32,
    pub cell_span_light_years: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            density_scale: 423.728_813_559,
            cell_span_light_years: 40.0,
        }
    }
}

/// Distance banding and nearest-neighbour pruning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    pub parsecs_per_unit: f32,
    pub max_neighbors: usize,
    /// Only edges shorter than this join the adjacency used by tracing.
    pub close_threshold_parsecs: f32,
    pub bands: Vec<JumpBand>,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            parsecs_per_unit: PARSECS_PER_LIGHT_YEAR,
            max_neighbors: 3,
            close_threshold_parsecs: 2.0,
            bands: default_bands(),
        }
    }
}

impl JumpConfig {
    /// Band index for a jump length, or `None` when it is out of range.
    pub fn band_for(&self, parsecs: f32) -> Option<usize> {
        if !(parsecs >= 0.0) {
            return None;
        }
        let band = parsecs as usize;
        (band < self.bands.len()).then_some(band)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpBand {
    pub color: Rgba,
}

fn default_bands() -> Vec<JumpBand> {
    vec![
        JumpBand {
            color: Rgba::new(255, 0, 0, 255),
        },
        JumpBand {
            color: Rgba::new(255, 159, 0, 255),
        },
        JumpBand {
            color: Rgba::new(255, 255, 9, 223),
        },
        JumpBand {
            color: Rgba::new(0, 0, 223, 191),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub max_iterations: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self { max_iterations: 48 }
    }
}

#[derive(Debug, Error)]
pub enum GalaxyConfigError {
    #[error("failed to parse galaxy config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read galaxy config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid galaxy config: {reason}")]
    Invalid { reason: String },
}
