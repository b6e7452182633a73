//! # Roadnet CLI
//!
//! Command-line interface for the roadnet library.
//! Extracts a road network for a bounding box and writes the network
//! document to a file or stdout.

use clap::Parser;
use log::error;

use roadnet::{extract, BoundingBox, Network, OverpassConfig};

/// Command-line interface for roadnet
#[derive(Parser)]
#[command(name = "roadnet")]
#[command(about = "OpenStreetMap road network extractor for traffic microsimulation")]
#[command(long_about = "Extracts drivable roads for a bounding box into a simulation-ready
network document:
  roadnet --bbox \"26.12,44.41,26.16,44.43\" --output dristor.json --name \"Bucharest Dristor\"
  roadnet --bbox \"26.12,44.41,26.16,44.43\" -            # stream to stdout

The bounding box is minLon,minLat,maxLon,maxLat in decimal degrees.")]
#[command(version)]
struct Cli {
    /// Bounding box: minLon,minLat,maxLon,maxLat (decimal degrees)
    #[arg(short, long)]
    bbox: String,

    /// Output file path, or "-" for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Display name stored in the network document
    #[arg(short, long, default_value = "Network")]
    name: String,

    /// Overpass request timeout in seconds (no retries are attempted)
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Overpass API endpoint
    #[arg(long, default_value = "https://overpass-api.de/api/interpreter")]
    endpoint: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Output destination types
#[derive(Debug, PartialEq)]
enum OutputDestination {
    File(String),
    Stdout,
}

/// Resolve output destination from CLI arguments
fn resolve_output(output: &str) -> OutputDestination {
    if output == "-" {
        OutputDestination::Stdout
    } else {
        OutputDestination::File(output.to_string())
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stderr);
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();

    // Validate the bounding box before any fetch is attempted
    let bbox = BoundingBox::parse(&cli.bbox)?;

    let config = OverpassConfig {
        endpoint: cli.endpoint,
        timeout_secs: cli.timeout,
    };

    eprintln!("🌐 Fetching map data for bbox: {}", cli.bbox);
    let network = extract(&bbox, &cli.name, &config).await?;
    eprintln!(
        "🛣️  Extracted {} road segments, {} connections",
        network.roads.len(),
        network.connection_count()
    );

    write_network(&network, &resolve_output(&cli.output))?;
    Ok(())
}

/// Write the network document to the resolved destination
fn write_network(network: &Network, destination: &OutputDestination) -> anyhow::Result<()> {
    use anyhow::Context;

    match destination {
        OutputDestination::File(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {path}"))?;
            network.to_writer_pretty(std::io::BufWriter::new(file))?;
            eprintln!("📁 Wrote network to: {path}");
        }
        OutputDestination::Stdout => {
            let stdout = std::io::stdout();
            network.to_writer_pretty(stdout.lock())?;
        }
    }
    Ok(())
}
