//! GeoJSON Offset CLI
//!
//! Moves a boundary file into the Zelonia map frame.
//!
//! Usage:
//!   offset-geojson --input data/Geojsons/singapore-boundary.geojson \
//!                  --output data/Geojsons/output.geojson \
//!                  --lon 120 --lat 5

use anyhow::{Context, Result};
use clap::Parser;
use geo_offset::{offset_file, Offset, DEFAULT_D_LAT, DEFAULT_D_LON};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "offset-geojson",
    about = "Shift every coordinate of a GeoJSON file by a constant offset"
)]
struct Args {
    /// Source GeoJSON file
    #[arg(short, long, default_value = "data/Geojsons/singapore-boundary.geojson")]
    input: PathBuf,

    /// Destination GeoJSON file
    #[arg(short, long, default_value = "data/Geojsons/output.geojson")]
    output: PathBuf,

    /// Degrees added to every longitude
    #[arg(long, default_value_t = DEFAULT_D_LON, allow_negative_numbers = true)]
    lon: f64,

    /// Degrees added to every latitude (negative moves south)
    #[arg(long, default_value_t = DEFAULT_D_LAT, allow_negative_numbers = true)]
    lat: f64,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let offset = Offset::new(args.lon, args.lat).context("invalid offset")?;
    if offset.is_identity() {
        info!("Offset is zero, output will match input");
    }

    let stats = offset_file(&args.input, &args.output, &offset, args.pretty)
        .with_context(|| format!("failed to offset {}", args.input.display()))?;

    info!(
        "Shifted {} positions in {} geometries by ({:+}, {:+})",
        stats.positions, stats.geometries, args.lon, args.lat
    );
    if stats.empty_features > 0 {
        info!("{} features had no geometry", stats.empty_features);
    }

    Ok(())
}
