use anyhow::{bail, Context, Result};
use dted::{GeoCoordinate, SampleOrder, Tile};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use super::load_tile;

pub fn run(
    sample_order: Option<SampleOrder>,
    tile: PathBuf,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: String,
    lon_col: String,
    fractional: bool,
) -> Result<()> {
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension != "csv" {
        bail!("Unsupported file format: {}. Use .csv", extension);
    }

    let tile = load_tile(sample_order, &tile)?;

    let output_path = output.unwrap_or_else(|| default_output_path(&input));
    let file = File::open(&input).context("Failed to open input file")?;
    let output_file = File::create(&output_path).context("Failed to create output file")?;

    let (total, voids) = process_csv(
        &tile,
        BufReader::new(file),
        BufWriter::new(output_file),
        &lat_col,
        &lon_col,
        fractional,
    )?;

    tracing::info!(total, voids, "Batch finished");
    println!("Output written to: {}", output_path.display());
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}_elevation.csv", stem))
}

/// Copy every CSV record to `writer` with an extra `elevation` column.
///
/// Records whose coordinate cannot be resolved get `void`. Returns the number
/// of records and the number of voids.
fn process_csv<R: Read, W: Write>(
    tile: &Tile,
    reader: R,
    writer: W,
    lat_col: &str,
    lon_col: &str,
    fractional: bool,
) -> Result<(u64, u64)> {
    let mut reader = csv::Reader::from_reader(reader);

    // Find column indices
    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
    let total = records.len() as u64;

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let mut writer = csv::Writer::from_writer(writer);

    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("elevation");
    writer.write_record(&new_headers)?;

    let mut voids = 0;
    for record in records {
        let lat: f64 = record
            .get(lat_idx)
            .context("Missing latitude")?
            .trim()
            .parse()
            .context("Invalid latitude")?;
        let lon: f64 = record
            .get(lon_idx)
            .context("Missing longitude")?
            .trim()
            .parse()
            .context("Invalid longitude")?;

        let coord = GeoCoordinate::new(lat, lon);
        let result = if fractional {
            tile.get_elevation_fractional(coord)
        } else {
            tile.get_elevation(coord)
        };

        let elevation = match result {
            Ok(e) => e.to_string(),
            Err(e) => {
                tracing::debug!(lat, lon, error = %e, "Elevation query failed");
                voids += 1;
                "void".to_string()
            }
        };

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(&elevation);
        writer.write_record(&new_record)?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    Ok((total, voids))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 tile image at (lat=10, lon=20) with native-order samples.
    fn tile() -> Tile {
        let mut bytes = vec![b' '; 3428];
        bytes[..20].copy_from_slice(b"UHL10200000E0100000N");
        bytes[20..35].copy_from_slice(b"00300030NA  U  ");
        bytes[47..56].copy_from_slice(b"000200020");
        bytes[80..83].copy_from_slice(b"DSI");
        bytes[80 + 185..80 + 204].copy_from_slice(b"100000.0N0200000.0E");
        bytes[80 + 273..80 + 291].copy_from_slice(b"003000300002000200");
        bytes[728..731].copy_from_slice(b"ACC");
        for column in [[1i16, 2], [3, 4]] {
            bytes.extend_from_slice(&[0xAA, 0, 0, 0, 0, 0, 0, 0]);
            for sample in column {
                bytes.extend_from_slice(&sample.to_ne_bytes());
            }
            bytes.extend_from_slice(&[0; 4]);
        }
        Tile::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_process_csv() {
        let input = "name,lat,lon\na,10.0,20.0\nb,11.0,21.0\nc,15.0,20.0\n";
        let mut output = Vec::new();

        let (total, voids) =
            process_csv(&tile(), input.as_bytes(), &mut output, "lat", "lon", false).unwrap();

        assert_eq!((total, voids), (3, 1));
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "name,lat,lon,elevation\na,10.0,20.0,1\nb,11.0,21.0,4\nc,15.0,20.0,void\n"
        );
    }

    #[test]
    fn test_process_csv_missing_column() {
        let input = "y,x\n10.0,20.0\n";
        let result = process_csv(&tile(), input.as_bytes(), Vec::new(), "lat", "lon", false);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/points.csv")),
            PathBuf::from("/data/points_elevation.csv")
        );
    }
}
