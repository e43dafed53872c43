use anyhow::Result;
use clap::{Parser, Subcommand};
use dted::SampleOrder;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// DTED elevation tile CLI tool
#[derive(Parser)]
#[command(name = "dted")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Byte order of stored samples: "native" or "big-endian"
    /// (defaults to DTED_SAMPLE_ORDER, then native)
    #[arg(short, long, global = true)]
    sample_order: Option<SampleOrder>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query elevation for a single coordinate
    Query {
        /// Path to a DTED file (.dt0/.dt1/.dt2) or a .zip holding one
        tile: PathBuf,

        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Select the nearest sample instead of the legacy whole-degree index
        #[arg(short, long)]
        fractional: bool,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Query elevation for every coordinate of a CSV file
    Batch {
        /// Path to a DTED file (.dt0/.dt1/.dt2) or a .zip holding one
        tile: PathBuf,

        /// Input CSV file
        input: PathBuf,

        /// Output file (defaults to <input>_elevation.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,

        /// Select the nearest sample instead of the legacy whole-degree index
        #[arg(short, long)]
        fractional: bool,
    },

    /// Display header and raster information about a tile
    Info {
        /// Path to a DTED file (.dt0/.dt1/.dt2) or a .zip holding one
        tile: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dted=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            tile,
            lat,
            lon,
            fractional,
            json,
        } => commands::query::run(cli.sample_order, tile, lat, lon, fractional, json),
        Commands::Batch {
            tile,
            input,
            output,
            lat_col,
            lon_col,
            fractional,
        } => commands::batch::run(
            cli.sample_order,
            tile,
            input,
            output,
            lat_col,
            lon_col,
            fractional,
        ),
        Commands::Info { tile } => commands::info::run(cli.sample_order, tile),
    }
}
