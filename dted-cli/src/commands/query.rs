use anyhow::{Context, Result};
use dted::{GeoCoordinate, SampleOrder};
use serde::Serialize;
use std::path::PathBuf;

use super::load_tile;

#[derive(Serialize)]
struct ElevationResponse {
    lat: f64,
    lon: f64,
    elevation: f32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    fractional: bool,
}

pub fn run(
    sample_order: Option<SampleOrder>,
    tile: PathBuf,
    lat: f64,
    lon: f64,
    fractional: bool,
    json: bool,
) -> Result<()> {
    let tile = load_tile(sample_order, &tile)?;
    let coord = GeoCoordinate::new(lat, lon);

    let elevation = if fractional {
        tile.get_elevation_fractional(coord)
    } else {
        tile.get_elevation(coord)
    }
    .context("Failed to get elevation")?;

    if json {
        let response = ElevationResponse {
            lat,
            lon,
            elevation,
            fractional,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{}", elevation);
    }

    Ok(())
}
