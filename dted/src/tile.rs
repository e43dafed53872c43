//! DTED tile decoding and elevation extraction.
//!
//! This module provides the [`Tile`] struct, which holds the decoded header
//! records and elevation grid of one DTED file and answers point queries.

use std::path::Path;

use crate::block::SampleOrder;
use crate::error::{DtedError, Result};
use crate::grid::ElevationGrid;
use crate::header::{Acc, Dsi, TileHeaders, Uhl, HEADER_SIZE};
use crate::raster::decode_raster;
use crate::reader::TileReader;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Grid index along one axis using the legacy formula.
///
/// The degree offset from the origin is rounded to a whole number of degrees
/// (half to even) and only then scaled by `count - 1`. Any offset below half a
/// degree therefore maps to index 0, whatever the grid resolution.
pub fn legacy_index(delta_degrees: f64, count: usize) -> f64 {
    delta_degrees.round_ties_even() * count.saturating_sub(1) as f64
}

/// Grid index along one axis using the nearest sample.
///
/// The degree offset is scaled to a fractional cell position first and then
/// rounded, so sub-degree offsets select the closest sample.
pub fn fractional_index(delta_degrees: f64, count: usize) -> f64 {
    (delta_degrees * count.saturating_sub(1) as f64).round()
}

/// A decoded DTED tile.
///
/// The tile owns its headers and elevation grid; the source file is not kept
/// open after loading.
///
/// # Example
///
/// ```ignore
/// use dted::{GeoCoordinate, Tile};
///
/// let tile = Tile::open("n35.dt1")?;
/// let elevation = tile.get_elevation(GeoCoordinate::new(35.0, 138.0))?;
/// println!("Elevation: {}m", elevation);
/// ```
#[derive(Debug, Clone)]
pub struct Tile {
    headers: TileHeaders,
    /// `None` when the DSI record is absent
    grid: Option<ElevationGrid>,
    sample_order: SampleOrder,
}

impl Tile {
    /// Load a tile from a DTED file with the default reader settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or memory-mapped
    /// - A header record is present but malformed
    /// - The raster payload is shorter than the DSI announces
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        TileReader::new().open(path)
    }

    /// Decode a tile from an in-memory file image with the default reader settings.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        TileReader::new().read_bytes(bytes)
    }

    /// Create a [`TileReader`] for more configuration options.
    pub fn builder() -> TileReader {
        TileReader::new()
    }

    /// Decode headers and raster from a complete file image.
    ///
    /// Truncated headers are left unset. Without a DSI no raster is decoded
    /// and every elevation query fails with [`DtedError::MissingHeader`].
    pub(crate) fn decode(bytes: &[u8], sample_order: SampleOrder) -> Result<Self> {
        let headers = TileHeaders::decode(bytes)?;
        let payload = bytes.get(HEADER_SIZE..).unwrap_or(&[]);

        let grid = match &headers.dsi {
            Some(dsi) => Some(decode_raster(payload, dsi, sample_order)?),
            None => {
                tracing::warn!(len = bytes.len(), "No DSI record, raster not decoded");
                None
            }
        };

        Ok(Self {
            headers,
            grid,
            sample_order,
        })
    }

    /// Get the elevation at the specified coordinate.
    ///
    /// Indices are computed with [`legacy_index`] on both axes using the DSI
    /// origin and shape, and the sample at `[lon_index, lat_index]` is
    /// returned as is.
    ///
    /// # Errors
    ///
    /// - [`DtedError::MissingHeader`] if the tile has no DSI record
    /// - [`DtedError::IndexOutOfRange`] if the coordinate maps outside the grid
    pub fn get_elevation(&self, coord: GeoCoordinate) -> Result<f32> {
        self.lookup(coord, legacy_index)
    }

    /// Get the elevation of the sample nearest to the specified coordinate.
    ///
    /// Same as [`Self::get_elevation`] but with [`fractional_index`], so
    /// positions inside the tile resolve to their closest sample.
    pub fn get_elevation_fractional(&self, coord: GeoCoordinate) -> Result<f32> {
        self.lookup(coord, fractional_index)
    }

    fn lookup(&self, coord: GeoCoordinate, index: fn(f64, usize) -> f64) -> Result<f32> {
        let (dsi, grid) = match (&self.headers.dsi, &self.grid) {
            (Some(dsi), Some(grid)) => (dsi, grid),
            _ => return Err(DtedError::MissingHeader { record: "DSI" }),
        };

        let origin = dsi.origin();
        let (lon_count, lat_count) = dsi.shape();
        let lon_pos = index(coord.longitude - origin.longitude, lon_count);
        let lat_pos = index(coord.latitude - origin.latitude, lat_count);

        to_index(lon_pos)
            .zip(to_index(lat_pos))
            .and_then(|(lon, lat)| grid.get(lon, lat))
            .ok_or(DtedError::IndexOutOfRange {
                lat: coord.latitude,
                lon: coord.longitude,
                lon_index: lon_pos as i64,
                lat_index: lat_pos as i64,
                columns: grid.columns(),
                rows: grid.rows(),
            })
    }

    /// Returns all three header records.
    pub fn headers(&self) -> &TileHeaders {
        &self.headers
    }

    pub fn uhl(&self) -> Option<&Uhl> {
        self.headers.uhl.as_ref()
    }

    pub fn dsi(&self) -> Option<&Dsi> {
        self.headers.dsi.as_ref()
    }

    pub fn acc(&self) -> Option<&Acc> {
        self.headers.acc.as_ref()
    }

    /// Returns the decoded grid, `None` when the DSI record is absent.
    pub fn grid(&self) -> Option<&ElevationGrid> {
        self.grid.as_ref()
    }

    /// Returns the byte order the samples were decoded with.
    pub fn sample_order(&self) -> SampleOrder {
        self.sample_order
    }
}

fn to_index(position: f64) -> Option<usize> {
    if position.is_finite() && position >= 0.0 {
        Some(position as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{UHL_SIZE, DSI_SIZE};
    use crate::test_support::{dsi_record, tile_image, uhl_record};
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// 2x2 tile at (lat=10, lon=20), columns west to east, samples south to north
    fn small_tile() -> Tile {
        Tile::from_bytes(&tile_image(10, 20, &[&[100, 110], &[200, 210]])).unwrap()
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&tile_image(10, 20, &[&[1, 2], &[3, 4]]))
            .unwrap();

        let tile = Tile::open(file.path()).unwrap();
        let grid = tile.grid().unwrap();
        assert_eq!(grid.columns(), 2);
        assert_eq!(grid.rows(), 2);
        assert_eq!(tile.dsi().unwrap().block_length(), 16);
        assert!(tile.uhl().is_some());
        assert!(tile.acc().is_some());
        assert_eq!(tile.sample_order(), SampleOrder::Native);
    }

    #[test]
    fn test_open_missing_file() {
        let result = Tile::open("/nonexistent/n35.dt1");
        assert!(matches!(result, Err(DtedError::Io(_))));
    }

    #[test]
    fn test_get_elevation_at_origin() {
        let tile = small_tile();
        let elev = tile.get_elevation(GeoCoordinate::new(10.0, 20.0)).unwrap();
        assert_eq!(elev, 100.0);
    }

    #[test]
    fn test_get_elevation_opposite_corner() {
        let tile = small_tile();
        // round(1) * (2 - 1) = 1 on both axes
        let elev = tile.get_elevation(GeoCoordinate::new(11.0, 21.0)).unwrap();
        assert_eq!(elev, 210.0);

        let elev = tile.get_elevation(GeoCoordinate::new(11.0, 20.0)).unwrap();
        assert_eq!(elev, 110.0);
    }

    #[test]
    fn test_legacy_sub_degree_collapses_to_origin() {
        let tile = small_tile();
        let elev = tile.get_elevation(GeoCoordinate::new(10.4, 20.49)).unwrap();
        assert_eq!(elev, 100.0);
    }

    #[test]
    fn test_fractional_lookup() {
        let tile = Tile::from_bytes(&tile_image(
            10,
            20,
            &[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]],
        ))
        .unwrap();

        // 0.5 degrees into a 3x3 tile is the middle sample
        let coord = GeoCoordinate::new(10.5, 20.5);
        assert_eq!(tile.get_elevation_fractional(coord).unwrap(), 5.0);
        // Legacy formula rounds 0.5 to 0 (half to even)
        assert_eq!(tile.get_elevation(coord).unwrap(), 1.0);

        let coord = GeoCoordinate::new(10.8, 20.2);
        assert_eq!(tile.get_elevation_fractional(coord).unwrap(), 3.0);
    }

    #[test]
    fn test_index_formulas() {
        assert_eq!(legacy_index(0.0, 1201), 0.0);
        assert_eq!(legacy_index(0.49, 1201), 0.0);
        assert_eq!(legacy_index(0.5, 1201), 0.0);
        assert_eq!(legacy_index(1.0, 1201), 1200.0);
        assert_eq!(legacy_index(1.5, 2), 2.0);
        assert_eq!(legacy_index(2.5, 2), 2.0);
        assert_eq!(legacy_index(-0.7, 3), -2.0);

        assert_eq!(fractional_index(0.5, 1201), 600.0);
        assert_eq!(fractional_index(0.25, 5), 1.0);
        assert_eq!(fractional_index(1.0, 3), 2.0);
    }

    #[test]
    fn test_out_of_range_query() {
        let tile = small_tile();

        match tile.get_elevation(GeoCoordinate::new(12.0, 20.0)) {
            Err(DtedError::IndexOutOfRange {
                lon_index,
                lat_index,
                columns,
                rows,
                ..
            }) => {
                assert_eq!((lon_index, lat_index), (0, 2));
                assert_eq!((columns, rows), (2, 2));
            }
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }

        // Negative offsets are rejected rather than wrapped or clamped
        assert!(matches!(
            tile.get_elevation(GeoCoordinate::new(9.0, 20.0)),
            Err(DtedError::IndexOutOfRange { lat_index: -1, .. })
        ));
        assert!(matches!(
            tile.get_elevation(GeoCoordinate::new(f64::NAN, 20.0)),
            Err(DtedError::IndexOutOfRange { .. })
        ));

        // The tile stays usable after a failed query
        assert_eq!(
            tile.get_elevation(GeoCoordinate::new(10.0, 20.0)).unwrap(),
            100.0
        );
    }

    #[test]
    fn test_missing_dsi() {
        // UHL only, file ends before the DSI record
        let mut bytes = uhl_record(10, 20, 2, 2);
        bytes.extend_from_slice(&[b' '; DSI_SIZE - 1]);
        assert!(bytes.len() < UHL_SIZE + DSI_SIZE);

        let tile = Tile::from_bytes(&bytes).unwrap();
        assert!(tile.uhl().is_some());
        assert!(tile.dsi().is_none());
        assert!(tile.grid().is_none());

        let result = tile.get_elevation(GeoCoordinate::new(10.0, 20.0));
        assert!(matches!(
            result,
            Err(DtedError::MissingHeader { record: "DSI" })
        ));
        assert!(tile
            .get_elevation_fractional(GeoCoordinate::new(10.0, 20.0))
            .is_err());
    }

    #[test]
    fn test_empty_file() {
        let tile = Tile::from_bytes(&[]).unwrap();
        assert_eq!(tile.headers(), &TileHeaders::default());
    }

    #[test]
    fn test_missing_acc_fails_raster() {
        // DSI present but the file ends before any column block
        let mut bytes = uhl_record(10, 20, 2, 2);
        bytes.extend(dsi_record(10, 20, 2, 2));

        assert!(matches!(
            Tile::from_bytes(&bytes),
            Err(DtedError::OutOfRange {
                required: 32,
                available: 0
            })
        ));
    }

    #[test]
    fn test_truncated_raster_aborts() {
        let bytes = tile_image(10, 20, &[&[1, 2], &[3, 4]]);
        let result = Tile::from_bytes(&bytes[..bytes.len() - 1]);
        assert!(matches!(result, Err(DtedError::OutOfRange { .. })));
    }

    #[test]
    fn test_malformed_dsi_aborts() {
        let mut bytes = tile_image(10, 20, &[&[1, 2], &[3, 4]]);
        bytes[UHL_SIZE..UHL_SIZE + 3].copy_from_slice(b"XXX");

        assert!(matches!(
            Tile::from_bytes(&bytes),
            Err(DtedError::InvalidHeader { record: "DSI", .. })
        ));
    }
}
