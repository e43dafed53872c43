//! Tile loading configuration.
//!
//! [`TileReader`] decides how raw samples are interpreted and where the tile
//! bytes come from: a plain file, a zip archive, or memory.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DTED_SAMPLE_ORDER` | Sample byte order: "native" or "big-endian" | native |

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;

use crate::block::SampleOrder;
use crate::error::{DtedError, Result};
use crate::tile::Tile;

/// Environment variable read by [`TileReader::from_env`].
pub const SAMPLE_ORDER_ENV: &str = "DTED_SAMPLE_ORDER";

/// File extensions of DTED levels 0, 1 and 2.
const DTED_EXTENSIONS: [&str; 3] = [".dt0", ".dt1", ".dt2"];

/// Builder-style loader for [`Tile`]s.
///
/// # Example
///
/// ```ignore
/// use dted::{SampleOrder, TileReader};
///
/// let tile = TileReader::new()
///     .sample_order(SampleOrder::BigEndian)
///     .open("e138/n35.dt1")?;
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileReader {
    sample_order: SampleOrder,
}

impl TileReader {
    /// Create a reader with default settings (native sample order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader configured from environment variables.
    ///
    /// An unset `DTED_SAMPLE_ORDER` keeps the default.
    ///
    /// # Errors
    ///
    /// Returns [`DtedError::InvalidConfig`] if `DTED_SAMPLE_ORDER` holds an
    /// unknown value.
    pub fn from_env() -> Result<Self> {
        let sample_order = match std::env::var(SAMPLE_ORDER_ENV) {
            Ok(value) => value.parse()?,
            Err(_) => SampleOrder::default(),
        };

        Ok(Self { sample_order })
    }

    /// Set the byte order used to decode samples.
    pub fn sample_order(mut self, order: SampleOrder) -> Self {
        self.sample_order = order;
        self
    }

    /// Returns the configured sample order.
    pub fn get_sample_order(&self) -> SampleOrder {
        self.sample_order
    }

    /// Load a tile from a DTED file.
    ///
    /// The file is memory-mapped for decoding and unmapped before returning.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<Tile> {
        let path = path.as_ref();
        let file = File::open(path)?;

        // SAFETY: Memory mapping is safe as long as the file is not modified
        // while mapped. We open the file read-only and drop the mapping
        // before returning.
        let mmap = unsafe { Mmap::map(&file)? };

        let tile = Tile::decode(&mmap, self.sample_order)?;
        log_loaded(&tile, &path.display().to_string());
        Ok(tile)
    }

    /// Load the first DTED entry (`.dt0`, `.dt1` or `.dt2`) of a zip archive.
    ///
    /// # Errors
    ///
    /// Returns [`DtedError::EntryNotFound`] if the archive holds no DTED file.
    pub fn open_zip<P: AsRef<Path>>(&self, path: P) -> Result<Tile> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| DtedError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| {
                DtedError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })?;

            let name = entry.name().to_lowercase();
            if !entry.is_dir() && DTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
                let mut bytes = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut bytes)?;

                let tile = Tile::decode(&bytes, self.sample_order)?;
                log_loaded(&tile, &format!("{}:{}", path.display(), entry.name()));
                return Ok(tile);
            }
        }

        Err(DtedError::EntryNotFound)
    }

    /// Decode a tile from an in-memory file image.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<Tile> {
        Tile::decode(bytes, self.sample_order)
    }
}

fn log_loaded(tile: &Tile, source: &str) {
    let (columns, rows) = tile
        .grid()
        .map_or((0, 0), |grid| (grid.columns(), grid.rows()));
    tracing::info!(
        source,
        columns,
        rows,
        sample_order = %tile.sample_order(),
        "Loaded tile"
    );
}
