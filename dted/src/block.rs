//! Column block decoding.
//!
//! Each longitudinal column of the raster is stored as one fixed-length block:
//!
//! ```text
//! [8 bytes]      prefix (sentinel, block count, longitude and latitude counts)
//! [N * 2 bytes]  N packed 16-bit signed samples, south to north
//! [4 bytes]      checksum
//! ```
//!
//! The prefix and checksum are discarded.

use std::fmt;
use std::str::FromStr;

use crate::error::{DtedError, Result};
use crate::header::BLOCK_FRAMING;

/// Leading bytes of a column block that precede the samples.
const BLOCK_PREFIX: usize = 8;

/// Byte order used to turn stored 16-bit samples into elevations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleOrder {
    /// Reinterpret the stored bytes in the host's native order, without any
    /// endianness correction. Compatible with tiles produced by existing
    /// readers of this layout.
    #[default]
    Native,
    /// Interpret the stored bytes as big-endian.
    BigEndian,
}

impl SampleOrder {
    /// Decode one stored sample.
    #[inline]
    pub fn decode(self, bytes: [u8; 2]) -> i16 {
        match self {
            SampleOrder::Native => i16::from_ne_bytes(bytes),
            SampleOrder::BigEndian => i16::from_be_bytes(bytes),
        }
    }
}

impl fmt::Display for SampleOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleOrder::Native => f.write_str("native"),
            SampleOrder::BigEndian => f.write_str("big-endian"),
        }
    }
}

impl FromStr for SampleOrder {
    type Err = DtedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(SampleOrder::Native),
            "big-endian" | "big_endian" | "be" => Ok(SampleOrder::BigEndian),
            other => Err(DtedError::InvalidConfig(format!(
                "unknown sample order {:?} (expected \"native\" or \"big-endian\")",
                other
            ))),
        }
    }
}

/// Number of samples held by a block of `block_length` bytes.
///
/// # Errors
///
/// Returns [`DtedError::InvalidBlock`] if the block cannot hold its framing.
pub fn samples_per_block(block_length: usize) -> Result<usize> {
    block_length
        .checked_sub(BLOCK_FRAMING)
        .map(|payload| payload / 2)
        .ok_or(DtedError::InvalidBlock {
            length: block_length,
        })
}

/// Decode one column block into elevation samples, in file order.
///
/// A block of exactly 12 bytes yields an empty column. An odd trailing byte
/// between the samples and the checksum is ignored.
pub fn decode_column(block: &[u8], order: SampleOrder) -> Result<Vec<f32>> {
    let count = samples_per_block(block.len())?;
    let samples = &block[BLOCK_PREFIX..BLOCK_PREFIX + count * 2];

    Ok(samples
        .chunks_exact(2)
        .map(|pair| f32::from(order.decode([pair[0], pair[1]])))
        .collect())
}
