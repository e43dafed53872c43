pub mod batch;
pub mod info;
pub mod query;

use anyhow::{Context, Result};
use dted::{SampleOrder, Tile, TileReader};
use std::path::Path;

/// Load a tile from a DTED file, or from the first DTED entry of a `.zip`.
///
/// An explicit sample order overrides `DTED_SAMPLE_ORDER`.
pub fn load_tile(sample_order: Option<SampleOrder>, path: &Path) -> Result<Tile> {
    let reader = match sample_order {
        Some(order) => TileReader::new().sample_order(order),
        None => TileReader::from_env().context("Invalid DTED_SAMPLE_ORDER")?,
    };

    let is_zip = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);

    let tile = if is_zip {
        reader.open_zip(path)
    } else {
        reader.open(path)
    };

    tile.with_context(|| format!("Failed to load tile {}", path.display()))
}
