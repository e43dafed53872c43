//! Dense elevation grid indexed `[lon_index, lat_index]`.

/// Elevation samples of one tile.
///
/// Samples are stored column-major in a single flat buffer: each longitudinal
/// column is contiguous and runs south to north, so `[lon, lat]` lives at
/// `lon * rows + lat`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    columns: usize,
    rows: usize,
    data: Vec<f32>,
}

impl ElevationGrid {
    /// Create a zero-filled grid.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            data: vec![0.0; columns * rows],
        }
    }

    /// Number of longitudinal columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of samples per column.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flat offset of `[lon, lat]`, or `None` if outside the grid.
    #[inline]
    pub fn offset(&self, lon: usize, lat: usize) -> Option<usize> {
        if lon < self.columns && lat < self.rows {
            Some(lon * self.rows + lat)
        } else {
            None
        }
    }

    /// Sample at `[lon, lat]`.
    #[inline]
    pub fn get(&self, lon: usize, lat: usize) -> Option<f32> {
        self.offset(lon, lat).map(|i| self.data[i])
    }

    /// All samples of column `lon`, south to north.
    pub fn column(&self, lon: usize) -> Option<&[f32]> {
        if lon < self.columns {
            let start = lon * self.rows;
            Some(&self.data[start..start + self.rows])
        } else {
            None
        }
    }

    /// Overwrite column `lon`.
    ///
    /// # Panics
    ///
    /// Panics if `lon` is out of range or `values` does not hold exactly
    /// [`Self::rows`] samples.
    pub fn set_column(&mut self, lon: usize, values: &[f32]) {
        assert!(lon < self.columns, "column {lon} out of range");
        let start = lon * self.rows;
        self.data[start..start + self.rows].copy_from_slice(values);
    }

    /// Smallest and largest sample, `None` for an empty grid.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Raw column-major samples.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
