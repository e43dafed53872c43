//! Builders for synthetic tile images used by the unit tests.

use crate::header::{ACC_SIZE, DSI_SIZE, UHL_SIZE};

fn put(record: &mut [u8], offset: usize, value: &str) {
    record[offset..offset + value.len()].copy_from_slice(value.as_bytes());
}

fn hemisphere(value: i32, positive: char, negative: char) -> char {
    if value >= 0 {
        positive
    } else {
        negative
    }
}

/// UHL record for a tile whose southwest corner is at whole degrees.
pub fn uhl_record(lat: i32, lon: i32, lon_lines: u32, lat_lines: u32) -> Vec<u8> {
    let mut record = vec![b' '; UHL_SIZE];
    put(&mut record, 0, "UHL1");
    put(
        &mut record,
        4,
        &format!("{:03}0000{}", lon.abs(), hemisphere(lon, 'E', 'W')),
    );
    put(
        &mut record,
        12,
        &format!("{:03}0000{}", lat.abs(), hemisphere(lat, 'N', 'S')),
    );
    put(&mut record, 20, "0030");
    put(&mut record, 24, "0030");
    put(&mut record, 28, "NA  ");
    put(&mut record, 32, "U  ");
    put(&mut record, 35, "TEST0001");
    put(&mut record, 47, &format!("{:04}", lon_lines));
    put(&mut record, 51, &format!("{:04}", lat_lines));
    put(&mut record, 55, "0");
    record
}

/// DSI record for a tile whose southwest corner is at whole degrees.
pub fn dsi_record(lat: i32, lon: i32, lon_lines: u32, lat_lines: u32) -> Vec<u8> {
    let mut record = vec![b' '; DSI_SIZE];
    put(&mut record, 0, "DSIU");
    put(&mut record, 59, "DTED1");
    put(&mut record, 64, "TEST0001");
    put(&mut record, 87, "01");
    put(&mut record, 141, "MSL");
    put(&mut record, 144, "WGS84");
    put(
        &mut record,
        185,
        &format!("{:02}0000.0{}", lat.abs(), hemisphere(lat, 'N', 'S')),
    );
    put(
        &mut record,
        194,
        &format!("{:03}0000.0{}", lon.abs(), hemisphere(lon, 'E', 'W')),
    );
    put(&mut record, 273, "0030");
    put(&mut record, 277, "0030");
    put(&mut record, 281, &format!("{:04}", lat_lines));
    put(&mut record, 285, &format!("{:04}", lon_lines));
    put(&mut record, 289, "00");
    record
}

pub fn acc_record() -> Vec<u8> {
    let mut record = vec![b' '; ACC_SIZE];
    put(&mut record, 0, "ACC");
    put(&mut record, 3, "0050");
    put(&mut record, 7, "0030");
    put(&mut record, 11, "NA  ");
    put(&mut record, 15, "NA  ");
    put(&mut record, 55, "00");
    record
}

/// One framed column block with the samples encoded by `encode`.
pub fn column_block(samples: &[i16], encode: fn(i16) -> [u8; 2]) -> Vec<u8> {
    let mut block = vec![0xAA, 0, 0, 0, 0, 0, 0, 0];
    for &sample in samples {
        block.extend_from_slice(&encode(sample));
    }
    block.extend_from_slice(&[0, 0, 0, 0]);
    block
}

/// Complete tile image with native-order samples, one slice per column.
pub fn tile_image(lat: i32, lon: i32, columns: &[&[i16]]) -> Vec<u8> {
    let lon_lines = columns.len() as u32;
    let lat_lines = columns.first().map_or(0, |c| c.len()) as u32;

    let mut image = uhl_record(lat, lon, lon_lines, lat_lines);
    image.extend(dsi_record(lat, lon, lon_lines, lat_lines));
    image.extend(acc_record());
    for column in columns {
        image.extend(column_block(column, i16::to_ne_bytes));
    }
    image
}
