//! Headless simulation runner
//!
//! Spawns a grid of actors, runs the engine for a fixed number of ticks
//! and writes the run report as JSON.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use gridwarden::core::config::EngineConfig;
use gridwarden::engine::Engine;

#[derive(Parser, Debug)]
#[command(name = "warden_sim")]
#[command(about = "Run a headless deterministic grid simulation")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 100)]
    ticks: u64,

    /// Number of mobile actors to spawn
    #[arg(long, default_value_t = 16)]
    actors: u32,

    /// Number of walkable static tiles to scatter
    #[arg(long, default_value_t = 4)]
    statics: u32,

    /// Optional TOML config file; flags below override nothing in it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the JSON run report
    #[arg(long, default_value = "warden_run.json")]
    output: PathBuf,

    /// Print every per-tick summary instead of just the last
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> gridwarden::core::error::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridwarden=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    println!("Grid: {}x{} cells", config.grid_width, config.grid_height);
    println!(
        "Spawning {} mobile actors, {} static tiles",
        args.actors, args.statics
    );
    println!("Simulating {} ticks...", args.ticks);

    let mut engine = Engine::new(config)?;

    // Deterministic diagonal-stride layout; spacing keeps spawn cells
    // distinct on small grids
    let width = engine.config().grid_width;
    let height = engine.config().grid_height;
    for i in 0..args.actors as i32 {
        let x = (i * 3 + 1) % width;
        let y = (i * 5 + 1) % height;
        if engine.map().actor_at(x, y, 0).is_absent() {
            engine.spawn_mobile(x, y)?;
        }
    }
    for i in 0..args.statics as i32 {
        let x = (i * 7 + 2) % width;
        let y = (i * 11 + 2) % height;
        if engine.map().actor_at(x, y, 0).is_absent() {
            engine.spawn_static(x, y)?;
        }
    }

    let start = Instant::now();
    let report = engine.run(args.ticks);
    let elapsed = start.elapsed();

    if args.verbose {
        for summary in &report.summaries {
            println!("{}", summary);
        }
    } else if let Some(last) = report.summaries.last() {
        println!("{}", last);
    }

    println!(
        "Ran {} ticks over {} actors in {:.2}ms",
        report.ticks,
        report.actor_count,
        elapsed.as_secs_f64() * 1000.0
    );

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&args.output, json)?;
    println!("Run report written to {}", args.output.display());

    Ok(())
}
