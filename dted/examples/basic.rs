//! Basic example demonstrating dted library usage.
//!
//! Run with: cargo run --example basic -- /path/to/n35.dt1 35.0 138.0

use dted::{DtedError, GeoCoordinate, Tile};
use std::env;

fn main() -> Result<(), DtedError> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: cargo run --example basic -- <tile.dt1> <lat> <lon>");
        std::process::exit(1);
    }

    let parse = |s: &str| {
        s.parse::<f64>().unwrap_or_else(|_| {
            eprintln!("Invalid coordinate: {}", s);
            std::process::exit(1);
        })
    };
    let coord = GeoCoordinate::new(parse(&args[2]), parse(&args[3]));

    let tile = Tile::open(&args[1])?;

    if let Some(dsi) = tile.dsi() {
        let (lon_count, lat_count) = dsi.shape();
        println!("Series: {}", dsi.series_designator);
        println!(
            "Origin: {:.4}, {:.4}",
            dsi.origin.latitude, dsi.origin.longitude
        );
        println!("Shape: {} x {}", lon_count, lat_count);
    }

    match tile.get_elevation(coord) {
        Ok(elevation) => println!("Elevation (legacy index): {}m", elevation),
        Err(e) => println!("Elevation (legacy index): error - {}", e),
    }
    match tile.get_elevation_fractional(coord) {
        Ok(elevation) => println!("Elevation (nearest sample): {}m", elevation),
        Err(e) => println!("Elevation (nearest sample): error - {}", e),
    }

    Ok(())
}
