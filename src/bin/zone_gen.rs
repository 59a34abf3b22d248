//! Headless dungeon generator
//!
//! Loads a zone catalog, grows a dungeon from a seed module and writes the
//! resulting layout as JSON.
//!
//! Usage:
//!   cargo run --bin zone_gen -- --catalog data/zones --seed-module entrance_hall --seed 42

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use zone_forge::blueprints::ZoneCatalog;
use zone_forge::core::error::Result;
use zone_forge::core::{set_config, GenerationConfig};
use zone_forge::generation::{GenerationRun, PlacementPlanner};

/// Zone Gen - grow a dungeon layout from a zone catalog
#[derive(Parser, Debug)]
#[command(name = "zone_gen")]
#[command(about = "Generate a dungeon layout by snapping zone modules onto open sockets")]
struct Args {
    /// Catalog TOML file, or a directory searched recursively for them
    #[arg(long, default_value = "data/zones")]
    catalog: PathBuf,

    /// Name of the zone the run starts from
    #[arg(long)]
    seed_module: String,

    /// Zones to place, seed module included (defaults to the config value)
    #[arg(long)]
    zones: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Generation config TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the layout JSON here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Log every placement decision
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("zone_forge={level},zone_gen={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        tracing::error!("Generation failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };
    if set_config(config.clone()).is_err() {
        tracing::warn!("Global config already set, keeping the existing one");
    }

    let mut catalog = ZoneCatalog::new();
    let loaded = catalog.load_path(&args.catalog)?;
    tracing::info!(
        "Loaded {} zones from {}",
        loaded.len(),
        args.catalog.display()
    );

    let zones = args.zones.unwrap_or(config.default_total_zones);
    let mut run = GenerationRun::new();
    run.start(catalog, zones, args.seed);

    let planner = PlacementPlanner::new(&config);
    let outcome = planner.generate(&mut run, &args.seed_module)?;

    eprintln!("{}", outcome.report);

    let json = serde_json::to_string_pretty(&outcome.to_layout_file())?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!("Layout written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
