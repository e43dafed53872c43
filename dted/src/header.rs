//! Fixed-size header records preceding the raster payload.
//!
//! A DTED file opens with three ASCII records at fixed offsets:
//!
//! ```text
//! [0, 80)        UHL  User Header Label
//! [80, 728)      DSI  Data Set Identification
//! [728, 3428)    ACC  Accuracy Description
//! [3428, ..)     raster payload (column blocks)
//! ```
//!
//! Each record implements [`HeaderRecord`]. The raster decoder only relies on
//! the DSI shape, origin and block length; the remaining fields are exposed
//! for display.

use std::ops::Range;

use crate::error::{DtedError, Result};
use crate::tile::GeoCoordinate;

/// Size of the User Header Label record in bytes.
pub const UHL_SIZE: usize = 80;

/// Size of the Data Set Identification record in bytes.
pub const DSI_SIZE: usize = 648;

/// Size of the Accuracy Description record in bytes.
pub const ACC_SIZE: usize = 2700;

/// Offset of the raster payload, right after the three header records.
pub const HEADER_SIZE: usize = UHL_SIZE + DSI_SIZE + ACC_SIZE;

/// Bytes of framing around the samples of each column block (8 leading, 4 trailing).
pub const BLOCK_FRAMING: usize = 12;

/// A fixed-size header record that can be decoded from raw bytes.
pub trait HeaderRecord: Sized {
    /// Short record name used in errors and logs.
    const NAME: &'static str;
    /// Three-byte recognition sentinel at the start of the record.
    const SENTINEL: &'static [u8; 3];
    /// Record size in bytes.
    const SIZE: usize;

    /// Decode the record from a buffer holding at least [`Self::SIZE`] bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

/// Decode a record at `offset`, leaving it absent when the file is too short.
///
/// Truncation is not an error: the caller receives `Ok(None)` and any
/// computation that depends on the record becomes unavailable. A record that
/// is fully present but malformed is an error.
pub fn decode_record<H: HeaderRecord>(bytes: &[u8], offset: usize) -> Result<Option<H>> {
    let available = bytes.len().saturating_sub(offset);
    if available < H::SIZE {
        tracing::warn!(
            record = H::NAME,
            offset,
            available,
            required = H::SIZE,
            "Header truncated, leaving it unset"
        );
        return Ok(None);
    }

    H::from_bytes(&bytes[offset..offset + H::SIZE]).map(Some)
}

/// The three header records of a tile, each possibly absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileHeaders {
    pub uhl: Option<Uhl>,
    pub dsi: Option<Dsi>,
    pub acc: Option<Acc>,
}

impl TileHeaders {
    /// Decode all three records from the start of a tile image.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            uhl: decode_record(bytes, 0)?,
            dsi: decode_record(bytes, UHL_SIZE)?,
            acc: decode_record(bytes, UHL_SIZE + DSI_SIZE)?,
        })
    }
}

/// User Header Label.
#[derive(Debug, Clone, PartialEq)]
pub struct Uhl {
    /// Origin of the data (southwest corner) in decimal degrees.
    pub origin: GeoCoordinate,
    /// Longitude interval in tenths of arc-seconds.
    pub longitude_interval: u32,
    /// Latitude interval in tenths of arc-seconds.
    pub latitude_interval: u32,
    /// Absolute vertical accuracy in meters, `None` when "NA".
    pub absolute_vertical_accuracy: Option<u32>,
    pub security_code: String,
    pub unique_reference: String,
    pub longitude_lines: u32,
    pub latitude_lines: u32,
    pub multiple_accuracy: bool,
}

impl HeaderRecord for Uhl {
    const NAME: &'static str = "UHL";
    const SENTINEL: &'static [u8; 3] = b"UHL";
    const SIZE: usize = UHL_SIZE;

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let r = RecordReader::<Self>::new(bytes)?;

        Ok(Self {
            origin: GeoCoordinate::new(r.angle(12..20, 3)?, r.angle(4..12, 3)?),
            longitude_interval: r.number(20..24)?,
            latitude_interval: r.number(24..28)?,
            absolute_vertical_accuracy: r.optional_number(28..32)?,
            security_code: r.text(32..35)?,
            unique_reference: r.text(35..47)?,
            longitude_lines: r.number(47..51)?,
            latitude_lines: r.number(51..55)?,
            multiple_accuracy: r.text(55..56)? == "1",
        })
    }
}

/// Data Set Identification.
///
/// Provides the raster shape and georeference used by the decoder and the
/// elevation query.
#[derive(Debug, Clone, PartialEq)]
pub struct Dsi {
    pub security_classification: String,
    /// DMA series designator, e.g. "DTED1".
    pub series_designator: String,
    pub unique_reference: String,
    pub data_edition: Option<u32>,
    pub vertical_datum: String,
    pub horizontal_datum: String,
    /// Origin (southwest corner) in decimal degrees.
    pub origin: GeoCoordinate,
    /// Latitude interval in tenths of arc-seconds.
    pub latitude_interval: u32,
    /// Longitude interval in tenths of arc-seconds.
    pub longitude_interval: u32,
    /// Number of latitude lines (samples per column).
    pub latitude_lines: u32,
    /// Number of longitude lines (columns).
    pub longitude_lines: u32,
    /// Partial cell indicator, 0 for a complete cell.
    pub partial_cell: Option<u32>,
}

impl Dsi {
    /// Raster shape as `(lon_count, lat_count)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.longitude_lines as usize, self.latitude_lines as usize)
    }

    /// Tile origin in decimal degrees.
    pub fn origin(&self) -> GeoCoordinate {
        self.origin
    }

    /// Length in bytes of one column block: framing plus 2 bytes per latitude line.
    pub fn block_length(&self) -> usize {
        BLOCK_FRAMING + 2 * self.latitude_lines as usize
    }
}

impl HeaderRecord for Dsi {
    const NAME: &'static str = "DSI";
    const SENTINEL: &'static [u8; 3] = b"DSI";
    const SIZE: usize = DSI_SIZE;

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let r = RecordReader::<Self>::new(bytes)?;

        let dsi = Self {
            security_classification: r.text(3..4)?,
            series_designator: r.text(59..64)?,
            unique_reference: r.text(64..79)?,
            data_edition: r.optional_number(87..89)?,
            vertical_datum: r.text(141..144)?,
            horizontal_datum: r.text(144..149)?,
            origin: GeoCoordinate::new(r.angle(185..194, 2)?, r.angle(194..204, 3)?),
            latitude_interval: r.number(273..277)?,
            longitude_interval: r.number(277..281)?,
            latitude_lines: r.number(281..285)?,
            longitude_lines: r.number(285..289)?,
            partial_cell: r.optional_number(289..291)?,
        };

        if dsi.latitude_lines == 0 || dsi.longitude_lines == 0 {
            return Err(r.invalid(format!(
                "shape must be positive, got {}x{}",
                dsi.longitude_lines, dsi.latitude_lines
            )));
        }

        Ok(dsi)
    }
}

/// Accuracy Description.
#[derive(Debug, Clone, PartialEq)]
pub struct Acc {
    /// Accuracies in meters, `None` when "NA".
    pub absolute_horizontal: Option<u32>,
    pub absolute_vertical: Option<u32>,
    pub relative_horizontal: Option<u32>,
    pub relative_vertical: Option<u32>,
    /// Number of accuracy subregions, 0 when the tile has a single accuracy.
    pub multiple_accuracy_outline: Option<u32>,
}

impl HeaderRecord for Acc {
    const NAME: &'static str = "ACC";
    const SENTINEL: &'static [u8; 3] = b"ACC";
    const SIZE: usize = ACC_SIZE;

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let r = RecordReader::<Self>::new(bytes)?;

        Ok(Self {
            absolute_horizontal: r.optional_number(3..7)?,
            absolute_vertical: r.optional_number(7..11)?,
            relative_horizontal: r.optional_number(11..15)?,
            relative_vertical: r.optional_number(15..19)?,
            multiple_accuracy_outline: r.optional_number(55..57)?,
        })
    }
}

/// Field accessor over a record buffer, reporting errors against record `H`.
struct RecordReader<'a, H> {
    bytes: &'a [u8],
    _record: std::marker::PhantomData<H>,
}

impl<'a, H: HeaderRecord> RecordReader<'a, H> {
    fn new(bytes: &'a [u8]) -> Result<Self> {
        let reader = Self {
            bytes,
            _record: std::marker::PhantomData,
        };

        if bytes.len() < H::SIZE {
            return Err(reader.invalid(format!(
                "expected {} bytes, got {}",
                H::SIZE,
                bytes.len()
            )));
        }
        if &bytes[..3] != H::SENTINEL {
            return Err(reader.invalid(format!(
                "bad sentinel {:?}",
                String::from_utf8_lossy(&bytes[..3])
            )));
        }

        Ok(reader)
    }

    fn invalid(&self, reason: String) -> DtedError {
        DtedError::InvalidHeader {
            record: H::NAME,
            reason,
        }
    }

    fn field(&self, range: Range<usize>) -> Result<&'a str> {
        let raw = &self.bytes[range.clone()];
        if !raw.is_ascii() {
            return Err(self.invalid(format!(
                "non-ASCII bytes at {}..{}",
                range.start, range.end
            )));
        }
        // ASCII is always valid UTF-8
        std::str::from_utf8(raw)
            .map(str::trim)
            .map_err(|e| self.invalid(e.to_string()))
    }

    fn text(&self, range: Range<usize>) -> Result<String> {
        self.field(range).map(str::to_string)
    }

    fn number(&self, range: Range<usize>) -> Result<u32> {
        let start = range.start;
        let value = self.field(range)?;
        value
            .parse()
            .map_err(|_| self.invalid(format!("expected a number at offset {start}, found {value:?}")))
    }

    fn optional_number(&self, range: Range<usize>) -> Result<Option<u32>> {
        let start = range.start;
        let value = self.field(range)?;
        if value.is_empty() || value.eq_ignore_ascii_case("NA") {
            return Ok(None);
        }
        value
            .parse()
            .map(Some)
            .map_err(|_| self.invalid(format!("expected a number at offset {start}, found {value:?}")))
    }

    /// Parse a `D..DMMSS[.S]H` angle with `degree_digits` digits of degrees.
    fn angle(&self, range: Range<usize>, degree_digits: usize) -> Result<f64> {
        let start = range.start;
        let value = self.field(range)?;
        parse_angle(value, degree_digits)
            .ok_or_else(|| self.invalid(format!("bad angle at offset {start}: {value:?}")))
    }
}

/// Convert a `D..DMMSS[.S]H` string into signed decimal degrees.
///
/// Returns `None` if the hemisphere letter or any numeric part is malformed.
pub fn parse_angle(value: &str, degree_digits: usize) -> Option<f64> {
    if !value.is_ascii() {
        return None;
    }
    let (body, hemisphere) = value.split_at(value.len().checked_sub(1)?);
    let sign = match hemisphere {
        "N" | "n" | "E" | "e" => 1.0,
        "S" | "s" | "W" | "w" => -1.0,
        _ => return None,
    };

    if body.len() < degree_digits + 4 {
        return None;
    }

    let degrees: f64 = body[..degree_digits].parse().ok()?;
    let minutes: f64 = body[degree_digits..degree_digits + 2].parse().ok()?;
    let seconds: f64 = body[degree_digits + 2..].parse().ok()?;

    Some(sign * (degrees + minutes / 60.0 + seconds / 3600.0))
}
