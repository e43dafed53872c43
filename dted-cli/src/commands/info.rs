use anyhow::Result;
use dted::{SampleOrder, Tile};
use std::path::PathBuf;

use super::load_tile;

pub fn run(sample_order: Option<SampleOrder>, path: PathBuf) -> Result<()> {
    let tile = load_tile(sample_order, &path)?;
    let file_size = std::fs::metadata(&path)?.len();

    println!("Tile: {}", path.display());
    println!("File size: {}", format_size(file_size));
    println!("Sample order: {}", tile.sample_order());
    println!();

    print_headers(&tile);

    match tile.grid() {
        Some(grid) => {
            println!();
            println!("Grid: {} columns x {} rows", grid.columns(), grid.rows());
            if let Some((min, max)) = grid.min_max() {
                println!("Min elevation: {}m", min);
                println!("Max elevation: {}m", max);
            }
        }
        None => {
            println!();
            println!("Grid: not decoded (DSI record missing)");
        }
    }

    Ok(())
}

fn print_headers(tile: &Tile) {
    match tile.uhl() {
        Some(uhl) => {
            println!("UHL");
            println!(
                "  Origin: {}, {}",
                format_lat(uhl.origin.latitude),
                format_lon(uhl.origin.longitude)
            );
            println!(
                "  Interval: {}\" lat x {}\" lon",
                tenths(uhl.latitude_interval),
                tenths(uhl.longitude_interval)
            );
            println!(
                "  Lines: {} lat x {} lon",
                uhl.latitude_lines, uhl.longitude_lines
            );
            println!(
                "  Vertical accuracy: {}",
                format_accuracy(uhl.absolute_vertical_accuracy)
            );
        }
        None => println!("UHL: missing"),
    }

    match tile.dsi() {
        Some(dsi) => {
            let (lon_count, lat_count) = dsi.shape();
            println!("DSI");
            println!("  Series: {}", dsi.series_designator);
            println!(
                "  Datum: {} / {}",
                dsi.horizontal_datum, dsi.vertical_datum
            );
            println!(
                "  Origin: {}, {}",
                format_lat(dsi.origin.latitude),
                format_lon(dsi.origin.longitude)
            );
            println!("  Shape: {} lon x {} lat", lon_count, lat_count);
            println!("  Block length: {} bytes", dsi.block_length());
        }
        None => println!("DSI: missing"),
    }

    match tile.acc() {
        Some(acc) => {
            println!("ACC");
            println!(
                "  Absolute: {} horizontal, {} vertical",
                format_accuracy(acc.absolute_horizontal),
                format_accuracy(acc.absolute_vertical)
            );
            println!(
                "  Relative: {} horizontal, {} vertical",
                format_accuracy(acc.relative_horizontal),
                format_accuracy(acc.relative_vertical)
            );
        }
        None => println!("ACC: missing"),
    }
}

fn tenths(value: u32) -> f64 {
    value as f64 / 10.0
}

fn format_accuracy(meters: Option<u32>) -> String {
    match meters {
        Some(m) => format!("{}m", m),
        None => "NA".to_string(),
    }
}

fn format_lat(lat: f64) -> String {
    format!("{:.4}°{}", lat.abs(), if lat >= 0.0 { "N" } else { "S" })
}

fn format_lon(lon: f64) -> String {
    format!("{:.4}°{}", lon.abs(), if lon >= 0.0 { "E" } else { "W" })
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
