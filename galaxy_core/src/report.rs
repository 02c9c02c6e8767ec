//! Travel report over the stars reached by a trace.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{catalog::GalaxyCatalog, stellar::StarId, trace::TraceResult};

pub const CSV_HEADER: &str =
    "id,x,y,z,starport,size,atmosphere,hydro,population,government,law,tech,jumps";

/// One jump leaving a reported star.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpSummary {
    pub to: StarId,
    pub parsecs: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRow {
    pub id: StarId,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub starport: char,
    pub size_km: u32,
    pub atmosphere: String,
    pub hydro_percent: u8,
    pub population: u64,
    pub government: String,
    pub law_level: String,
    pub tech_level: char,
    pub jumps: Vec<JumpSummary>,
}

impl TravelRow {
    pub fn jump_summary(&self) -> String {
        self.jumps
            .iter()
            .map(|jump| format!("jump to {} is {:.2} parsecs", jump.to, jump.parsecs))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write_csv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{},{:.4},{:.4},{:.4},{},{},{},{},{},{},{},{},{}",
            self.id,
            self.x,
            self.y,
            self.z,
            self.starport,
            self.size_km,
            quoted(&self.atmosphere),
            self.hydro_percent,
            self.population,
            quoted(&self.government),
            quoted(&self.law_level),
            self.tech_level,
            quoted(&self.jump_summary()),
        )
    }
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create travel report {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write travel report: {0}")]
    Write(#[from] io::Error),
    #[error("failed to encode travel report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Rows for every distinct star a trace touched, first occurrence kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelReport {
    pub start: Option<StarId>,
    pub rows: Vec<TravelRow>,
}

impl TravelReport {
    pub fn build(catalog: &GalaxyCatalog, trace: &TraceResult) -> Self {
        let generator = catalog.world_generator();
        let rows = trace
            .stars_in_order()
            .into_iter()
            .filter_map(|id| {
                let star = catalog.star(id)?;
                let world = generator.world_for(star);
                let jumps = catalog
                    .graph()
                    .jump_targets(id)
                    .into_iter()
                    .map(|(to, parsecs)| JumpSummary { to, parsecs })
                    .collect();
                Some(TravelRow {
                    id,
                    x: star.position.x,
                    y: star.position.y,
                    z: star.position.z,
                    starport: world.starport.letter(),
                    size_km: world.size_km,
                    atmosphere: world.atmosphere.description().to_string(),
                    hydro_percent: world.hydro_percent,
                    population: world.population,
                    government: world.government().to_string(),
                    law_level: world.law_level().to_string(),
                    tech_level: world.tech_level.code(),
                    jumps,
                })
            })
            .collect();
        Self {
            start: Some(trace.start),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_csv<W: Write>(&self, out: &mut W) -> Result<(), ReportError> {
        writeln!(out, "{CSV_HEADER}")?;
        for row in &self.rows {
            row.write_csv(out)?;
        }
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, ReportError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes CSV, or JSON when the path ends in `.json`.
    pub fn write_to_path(&self, path: &Path) -> Result<(), ReportError> {
        let file = File::create(path).map_err(|source| ReportError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::to_writer_pretty(&mut out, self)?;
            writeln!(out)?;
        } else {
            self.write_csv(&mut out)?;
        }
        out.flush()?;
        tracing::info!(
            target: "galaxy3d::report",
            path = %path.display(),
            rows = self.rows.len(),
            "report.written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{GalaxyConfig, JumpConfig},
        space::Position,
        stellar::{Star, StellarClass},
    };

    fn chain_catalog() -> GalaxyCatalog {
        let mut config = GalaxyConfig::default();
        config.jumps = JumpConfig {
            close_threshold_parsecs: 0.35,
            ..JumpConfig::default()
        };
        let stars = (0..4)
            .map(|i| Star::at(i, StellarClass::F, Position::new(i as f32, 0.0, 0.0)))
            .collect();
        let mut catalog = GalaxyCatalog::with_stars(config, stars);
        catalog.build();
        catalog
    }

    #[test]
    fn rows_follow_trace_order_once_each() {
        let catalog = chain_catalog();
        let report = catalog.travel_report().expect("catalog has stars");
        let ids: Vec<_> = report.rows.iter().map(|row| row.id).collect();
        assert_eq!(report.start, Some(0));
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(report.rows[1].jumps.len(), 2);
    }

    #[test]
    fn csv_has_header_and_quoted_summary() {
        let catalog = chain_catalog();
        let report = catalog.travel_report().expect("catalog has stars");
        let csv = report.to_csv_string().expect("in-memory write");
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        let first = lines.next().expect("first row");
        assert!(first.starts_with("0,0.0000,0.0000,0.0000,"));
        assert!(first.ends_with("\"jump to 1 is 0.31 parsecs\""));
        assert_eq!(csv.lines().count(), report.len() + 1);
    }

    #[test]
    fn law_column_carries_description() {
        let catalog = chain_catalog();
        let report = catalog.travel_report().expect("catalog has stars");
        let csv = report.to_csv_string().expect("in-memory write");
        for (row, line) in report.rows.iter().zip(csv.lines().skip(1)) {
            let world = catalog.world(row.id).expect("reported star exists");
            assert_eq!(row.law_level, world.law_level());
            assert_eq!(row.government, world.government());
            let fields = format!(
                "{},{},{}",
                quoted(world.government()),
                quoted(world.law_level()),
                world.tech_level.code()
            );
            assert!(line.contains(&fields), "{line}");
        }
    }

    #[test]
    fn json_round_trips() {
        let catalog = chain_catalog();
        let report = catalog.travel_report().expect("catalog has stars");
        let json = report.to_json().expect("encode");
        let decoded: TravelReport = serde_json::from_str(&json).expect("decode");
        assert_eq!(decoded, report);
    }

    #[test]
    fn unwritable_path_is_reported() {
        let catalog = chain_catalog();
        let report = catalog.travel_report().expect("catalog has stars");
        let path = std::env::temp_dir()
            .join("galaxy3d-missing-dir")
            .join("nested")
            .join("report.csv");
        let err = report.write_to_path(&path).unwrap_err();
        assert!(matches!(err, ReportError::Create { .. }));
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quoted("a \"b\""), "\"a \"\"b\"\"\"");
    }
}
