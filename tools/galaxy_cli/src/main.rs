use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use galaxy_core::{
    AttributeQuery, CatalogMetrics, Comparison, GalaxyCatalog, GalaxyConfig, RenderScene,
    Selector, StarFilter, StellarClass, WorldAttribute,
};
use tracing::{info, warn};

const CONFIG_ENV: &str = "GALAXY_CONFIG_PATH";

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless host for the Galaxy3D star catalog")]
struct Args {
    /// Galaxy config JSON (falls back to $GALAXY_CONFIG_PATH, then the builtin)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trace from the best-connected star and write the travel report
    Report {
        /// Output path; a `.json` extension switches to JSON
        #[arg(long, default_value = "travel_report.csv")]
        output: PathBuf,
    },
    /// Print the header and jump targets of a star
    Inspect {
        /// Star id (defaults to the first star)
        star: Option<usize>,

        /// Follow the n-th jump (1-based) out of the star
        #[arg(long)]
        jump: Option<usize>,

        /// Also print the render scene summary
        #[arg(long)]
        scene: bool,
    },
    /// List the stars matched by a named filter or an attribute threshold
    Filter {
        /// Filter name, e.g. "High Tech" or water-worlds
        #[arg(required_unless_present = "attribute")]
        name: Option<String>,

        #[arg(long, value_enum, requires = "value")]
        attribute: Option<AttributeArg>,

        #[arg(long, value_enum, default_value_t = ComparisonArg::AtLeast)]
        comparison: ComparisonArg,

        #[arg(long)]
        value: Option<u8>,

        /// Print full headers instead of ids
        #[arg(long)]
        verbose: bool,
    },
    /// Print catalog metrics
    Metrics {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AttributeArg {
    Tech,
    Population,
    Size,
    Hydro,
}

impl From<AttributeArg> for WorldAttribute {
    fn from(value: AttributeArg) -> Self {
        match value {
            AttributeArg::Tech => WorldAttribute::Tech,
            AttributeArg::Population => WorldAttribute::Population,
            AttributeArg::Size => WorldAttribute::Size,
            AttributeArg::Hydro => WorldAttribute::Hydro,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ComparisonArg {
    Exactly,
    AtLeast,
    AtMost,
}

impl From<ComparisonArg> for Comparison {
    fn from(value: ComparisonArg) -> Self {
        match value {
            ComparisonArg::Exactly => Comparison::Exactly,
            ComparisonArg::AtLeast => Comparison::AtLeast,
            ComparisonArg::AtMost => Comparison::AtMost,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        Arc::make_mut(&mut config).seed = seed;
    }

    let mut catalog = GalaxyCatalog::new(config);
    catalog.build();

    match args.command {
        Command::Report { output } => run_report(&catalog, &output),
        Command::Inspect { star, jump, scene } => run_inspect(&catalog, star, jump, scene),
        Command::Filter {
            name,
            attribute,
            comparison,
            value,
            verbose,
        } => run_filter(&catalog, name, attribute, comparison, value, verbose),
        Command::Metrics { json } => run_metrics(&catalog, json),
    }
}

/// An explicit `--config` must load; the environment override falls back to the builtin.
fn load_config(explicit: Option<&Path>) -> Result<Arc<GalaxyConfig>> {
    if let Some(path) = explicit {
        let config = GalaxyConfig::from_file(path)
            .with_context(|| format!("Failed to load galaxy config at {}", path.display()))?;
        info!(
            target: "galaxy3d::config",
            path = %path.display(),
            "galaxy_config.loaded=file"
        );
        return Ok(Arc::new(config));
    }

    if let Some(path) = env::var_os(CONFIG_ENV).map(PathBuf::from) {
        match GalaxyConfig::from_file(&path) {
            Ok(config) => {
                info!(
                    target: "galaxy3d::config",
                    path = %path.display(),
                    "galaxy_config.loaded=env"
                );
                return Ok(Arc::new(config));
            }
            Err(err) => {
                warn!(
                    target: "galaxy3d::config",
                    path = %path.display(),
                    error = %err,
                    "galaxy_config.load_failed"
                );
            }
        }
    }

    info!(target: "galaxy3d::config", "galaxy_config.loaded=builtin");
    Ok(GalaxyConfig::builtin())
}

fn run_report(catalog: &GalaxyCatalog, output: &Path) -> Result<()> {
    let Some(report) = catalog.travel_report() else {
        println!("Catalog is empty; no travel report written");
        return Ok(());
    };
    match report.write_to_path(output) {
        Ok(()) => println!(
            "Wrote {} rows from star {} to {}",
            report.len(),
            report.start.unwrap_or_default(),
            output.display()
        ),
        // The catalog stays usable; only the report step is lost.
        Err(err) => warn!(
            target: "galaxy3d::report",
            path = %output.display(),
            error = %err,
            "report.write_failed"
        ),
    }
    Ok(())
}

fn run_inspect(
    catalog: &GalaxyCatalog,
    star: Option<usize>,
    jump: Option<usize>,
    scene: bool,
) -> Result<()> {
    let mut selector = Selector::new(catalog);
    if let Some(star) = star {
        if catalog.star(star).is_none() {
            bail!(
                "star {star} is out of range (catalog has {} stars)",
                catalog.stars().len()
            );
        }
        while selector.current() != Some(star) {
            selector.next();
        }
    }
    if let Some(jump) = jump {
        let index = jump.checked_sub(1).context("jump numbers start at 1")?;
        selector.select_jump_target(catalog, index);
    }

    let Some(selection) = selector.selection(catalog) else {
        println!("Catalog is empty");
        return Ok(());
    };
    println!("{}", selection.header);
    let target = selection.camera_target;
    println!("Camera ({:.3}, {:.3}, {:.3})", target.x, target.y, target.z);
    for label in selection.jump_labels() {
        println!("{label}");
    }

    if scene {
        let mut render = RenderScene::from_catalog(catalog);
        render.highlight(Some(selection.star));
        println!(
            "Scene: {} points, {} lines, {} highlighted",
            render.points.len(),
            render.lines.len(),
            render.highlighted_lines().count()
        );
    }
    Ok(())
}

fn run_filter(
    catalog: &GalaxyCatalog,
    name: Option<String>,
    attribute: Option<AttributeArg>,
    comparison: ComparisonArg,
    value: Option<u8>,
    verbose: bool,
) -> Result<()> {
    let (label, matches) = match (attribute, value) {
        (Some(attribute), Some(value)) => {
            let query = AttributeQuery::new(attribute.into(), comparison.into(), value);
            (format!("{query:?}"), query.apply(catalog))
        }
        _ => {
            let name = name.context("either a filter name or --attribute is required")?;
            let filter: StarFilter = name.parse()?;
            (filter.to_string(), filter.apply(catalog))
        }
    };

    println!("{label}: {} stars", matches.len());
    for id in matches {
        if verbose {
            if let Some(world) = catalog.world(id) {
                println!("{}\n", world.header());
            }
        } else {
            println!("{id}");
        }
    }
    Ok(())
}

fn run_metrics(catalog: &GalaxyCatalog, json: bool) -> Result<()> {
    let metrics = CatalogMetrics::collect(catalog);
    if json {
        let text = serde_json::to_string_pretty(&metrics).context("Failed to encode metrics")?;
        println!("{text}");
        return Ok(());
    }

    println!("Stars: {}", metrics.stars);
    for class in StellarClass::ALL {
        println!("  {}: {}", class.letter(), metrics.class_count(class));
    }
    println!("Jump edges: {}", metrics.edges);
    println!("Connected edges: {}", metrics.connected_edges);
    println!("Isolated stars: {}", metrics.isolated_stars);
    match metrics.best_connected {
        Some(star) => println!("Best connected: star {star} ({} edges)", metrics.best_reach),
        None => println!("Best connected: none"),
    }
    Ok(())
}
