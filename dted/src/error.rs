//! Error types for the DTED library.

use thiserror::Error;

/// Errors that can occur when decoding or querying a DTED tile.
#[derive(Error, Debug)]
pub enum DtedError {
    /// IO error when reading files or archives.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A header record was present but could not be decoded.
    #[error("Invalid {record} header: {reason}")]
    InvalidHeader {
        record: &'static str,
        reason: String,
    },

    /// A header record needed for the operation was not present in the file.
    #[error("{record} header is missing (file truncated before the record)")]
    MissingHeader { record: &'static str },

    /// A column block is too short to hold its framing.
    #[error("Invalid column block: {length} bytes (at least 12 required)")]
    InvalidBlock { length: usize },

    /// The raster payload is shorter than the column blocks announced by the DSI.
    #[error("Raster payload out of range: {required} bytes required, {available} available")]
    OutOfRange { required: usize, available: usize },

    /// A coordinate maps to a cell outside the decoded grid.
    #[error(
        "Coordinate (lat={lat}, lon={lon}) maps to cell [{lon_index}, {lat_index}] \
         outside the {columns}x{rows} grid"
    )]
    IndexOutOfRange {
        lat: f64,
        lon: f64,
        lon_index: i64,
        lat_index: i64,
        columns: usize,
        rows: usize,
    },

    /// Configuration value could not be understood.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A zip archive did not contain any DTED tile.
    #[error("No DTED entry (.dt0/.dt1/.dt2) found in archive")]
    EntryNotFound,
}

/// Result type alias using [`DtedError`].
pub type Result<T> = std::result::Result<T, DtedError>;
