//! # DTED - Elevation Tile Decoder
//!
//! Library for decoding a single DTED (Digital Terrain Elevation Data) tile
//! and querying elevation at a coordinate.
//!
//! ## Features
//!
//! - **Self-contained**: Decodes the UHL, DSI and ACC header records and the
//!   raster of column blocks into an in-memory grid
//! - **Lenient headers**: A file truncated inside the header region still
//!   loads, with the missing records left unset
//! - **Explicit byte order**: Samples are read in native order by default;
//!   big-endian decoding is a separate, opt-in setting
//! - **Archives**: Tiles can be read straight out of `.zip` files
//!
//! ## Quick Start
//!
//! ```ignore
//! use dted::{GeoCoordinate, Tile};
//!
//! let tile = Tile::open("/data/dted/e138/n35.dt1")?;
//! let elevation = tile.get_elevation(GeoCoordinate::new(35.0, 138.0))?;
//! println!("Elevation: {}m", elevation);
//! ```
//!
//! ## DTED File Layout
//!
//! ```text
//! [80 bytes]     UHL  User Header Label
//! [648 bytes]    DSI  Data Set Identification (shape, origin)
//! [2700 bytes]   ACC  Accuracy Description
//! [lon_count x block_length bytes]
//!                one column block per longitude line:
//!                8-byte prefix, 16-bit samples south to north, 4-byte checksum
//! ```
//!
//! The grid is indexed `[lon_index, lat_index]` with column 0 at the western
//! edge and row 0 at the southern edge.

pub mod block;
pub mod error;
pub mod grid;
pub mod header;
pub mod raster;
pub mod reader;
pub mod tile;

#[cfg(test)]
mod test_support;

// Re-export main types at crate root for convenience
pub use block::SampleOrder;
pub use error::{DtedError, Result};
pub use grid::ElevationGrid;
pub use header::{Acc, Dsi, HeaderRecord, TileHeaders, Uhl};
pub use reader::TileReader;
pub use tile::{fractional_index, legacy_index, GeoCoordinate, Tile};
