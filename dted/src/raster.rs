//! Raster payload decoding.
//!
//! The payload following the header records is a run of `lon_count`
//! contiguous column blocks of `block_length` bytes each. Every block is
//! decoded into one column of the [`ElevationGrid`].

use crate::block::{decode_column, samples_per_block, SampleOrder};
use crate::error::{DtedError, Result};
use crate::grid::ElevationGrid;
use crate::header::Dsi;

/// Decode the raster payload using the shape and block length from `dsi`.
///
/// The grid row count is derived from the block length. If it disagrees with
/// the DSI latitude count the grid is still built as decoded.
pub fn decode_raster(payload: &[u8], dsi: &Dsi, order: SampleOrder) -> Result<ElevationGrid> {
    let (lon_count, lat_count) = dsi.shape();
    let grid = decode_columns(payload, lon_count, dsi.block_length(), order)?;

    if grid.rows() != lat_count {
        tracing::warn!(
            rows = grid.rows(),
            lat_count,
            "Decoded column length differs from DSI latitude count"
        );
    }

    Ok(grid)
}

/// Decode `columns` blocks of `block_length` bytes from the start of `payload`.
///
/// # Errors
///
/// - [`DtedError::InvalidBlock`] if `block_length` is below the framing size
/// - [`DtedError::OutOfRange`] if `payload` is shorter than
///   `columns * block_length` bytes
pub fn decode_columns(
    payload: &[u8],
    columns: usize,
    block_length: usize,
    order: SampleOrder,
) -> Result<ElevationGrid> {
    let rows = samples_per_block(block_length)?;

    let required = columns
        .checked_mul(block_length)
        .ok_or(DtedError::OutOfRange {
            required: usize::MAX,
            available: payload.len(),
        })?;
    if payload.len() < required {
        return Err(DtedError::OutOfRange {
            required,
            available: payload.len(),
        });
    }

    tracing::debug!(columns, rows, block_length, ?order, "Decoding raster");

    let mut grid = ElevationGrid::new(columns, rows);
    for (column, block) in payload[..required].chunks_exact(block_length).enumerate() {
        grid.set_column(column, &decode_column(block, order)?);
    }

    Ok(grid)
}
