//! GeoTIFF fixtures written to disk for the integration tests

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use weezl::encode::Encoder as LzwEncoder;
use weezl::BitOrder;

const IMAGE_WIDTH: u16 = 256;
const IMAGE_LENGTH: u16 = 257;
const BITS_PER_SAMPLE: u16 = 258;
const COMPRESSION: u16 = 259;
const STRIP_OFFSETS: u16 = 273;
const SAMPLES_PER_PIXEL: u16 = 277;
const ROWS_PER_STRIP: u16 = 278;
const STRIP_BYTE_COUNTS: u16 = 279;
const PREDICTOR: u16 = 317;
const TILE_WIDTH: u16 = 322;
const TILE_LENGTH: u16 = 323;
const TILE_OFFSETS: u16 = 324;
const TILE_BYTE_COUNTS: u16 = 325;
const SAMPLE_FORMAT: u16 = 339;
const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

const ASCII: u16 = 2;
const SHORT: u16 = 3;
const LONG: u16 = 4;
const DOUBLE: u16 = 12;

const NO_COMPRESSION: u16 = 1;
const LZW: u16 = 5;
const DEFLATE: u16 = 8;
const ZSTD: u16 = 50000;

/// Little-endian, single-band GeoTIFF
#[derive(Debug, Clone)]
pub struct GeoTiffFixture {
    width: u32,
    height: u32,
    bits_per_sample: u16,
    sample_format: u16,
    /// Samples, little-endian, row-major
    samples: Vec<u8>,
    /// (GeoKey id, EPSG code)
    crs_key: Option<(u16, u16)>,
    origin: (f64, f64),
    pixel_size: (f64, f64),
    nodata: Option<String>,
    /// Value of the Compression tag
    compression: u16,
    predictor: bool,
    rows_per_strip: Option<u32>,
    tile_size: Option<u32>,
}

impl GeoTiffFixture {
    fn new(width: u32, height: u32, bits_per_sample: u16, sample_format: u16, samples: Vec<u8>) -> Self {
        assert_eq!(samples.len(), (width * height) as usize * (bits_per_sample / 8) as usize);
        GeoTiffFixture {
            width,
            height,
            bits_per_sample,
            sample_format,
            samples,
            crs_key: Some((2048, 4326)),
            origin: (0.0, 0.0),
            pixel_size: (1.0, 1.0),
            nodata: None,
            compression: NO_COMPRESSION,
            predictor: false,
            rows_per_strip: None,
            tile_size: None,
        }
    }

    pub fn u8(width: u32, height: u32, values: &[u8]) -> Self {
        Self::new(width, height, 8, 1, values.to_vec())
    }

    pub fn u16(width: u32, height: u32, values: &[u16]) -> Self {
        let mut samples = Vec::new();
        for v in values {
            samples.write_u16::<LittleEndian>(*v).unwrap();
        }
        Self::new(width, height, 16, 1, samples)
    }

    pub fn f32(width: u32, height: u32, values: &[f32]) -> Self {
        let mut samples = Vec::new();
        for v in values {
            samples.write_f32::<LittleEndian>(*v).unwrap();
        }
        Self::new(width, height, 32, 3, samples)
    }

    /// Georeferenced in a geographic CRS (GeographicTypeGeoKey)
    pub fn geographic(mut self, epsg: u16) -> Self {
        self.crs_key = Some((2048, epsg));
        self
    }

    /// Georeferenced in a projected CRS (ProjectedCSTypeGeoKey)
    pub fn projected(mut self, epsg: u16) -> Self {
        self.crs_key = Some((3072, epsg));
        self
    }

    pub fn without_crs(mut self) -> Self {
        self.crs_key = None;
        self
    }

    /// Upper-left corner and pixel size, in CRS units
    pub fn placed_at(mut self, x: f64, y: f64, pixel_x: f64, pixel_y: f64) -> Self {
        self.origin = (x, y);
        self.pixel_size = (pixel_x, pixel_y);
        self
    }

    pub fn nodata(mut self, value: &str) -> Self {
        self.nodata = Some(value.to_string());
        self
    }

    pub fn deflate(mut self) -> Self {
        self.compression = DEFLATE;
        self
    }

    pub fn lzw(mut self) -> Self {
        self.compression = LZW;
        self
    }

    pub fn zstd(mut self) -> Self {
        self.compression = ZSTD;
        self
    }

    /// Horizontal differencing, integer samples only
    pub fn predictor(mut self) -> Self {
        self.predictor = true;
        self
    }

    pub fn rows_per_strip(mut self, rows: u32) -> Self {
        self.rows_per_strip = Some(rows);
        self
    }

    pub fn tiled(mut self, tile_size: u32) -> Self {
        self.tile_size = Some(tile_size);
        self
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) {
        std::fs::write(path, self.to_bytes()).unwrap();
    }

    fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample / 8) as usize
    }

    /// Pixel rows `[row, row + rows)` cropped to columns `[col, col + cols)`,
    /// zero padded to `cols` samples per row and `rows` rows
    fn block(&self, col: u32, row: u32, cols: u32, rows: u32) -> Vec<u8> {
        let bps = self.bytes_per_sample();
        let mut block = Vec::new();
        for r in row..row + rows {
            for c in col..col + cols {
                if r < self.height && c < self.width {
                    let start = ((r * self.width + c) as usize) * bps;
                    block.extend_from_slice(&self.samples[start..start + bps]);
                } else {
                    block.extend(std::iter::repeat(0u8).take(bps));
                }
            }
        }
        block
    }

    fn encode_chunk(&self, mut chunk: Vec<u8>, row_samples: usize) -> Vec<u8> {
        if self.predictor {
            let bps = self.bytes_per_sample();
            for row in chunk.chunks_mut(row_samples * bps) {
                for i in (1..row_samples).rev() {
                    match bps {
                        1 => row[i] = row[i].wrapping_sub(row[i - 1]),
                        2 => {
                            let cur = u16::from_le_bytes([row[2 * i], row[2 * i + 1]]);
                            let prev = u16::from_le_bytes([row[2 * i - 2], row[2 * i - 1]]);
                            row[2 * i..2 * i + 2].copy_from_slice(&cur.wrapping_sub(prev).to_le_bytes());
                        }
                        _ => panic!("predictor fixture supports 8 and 16 bit samples"),
                    }
                }
            }
        }

        match self.compression {
            DEFLATE => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&chunk).unwrap();
                encoder.finish().unwrap()
            }
            LZW => LzwEncoder::with_tiff_size_switch(BitOrder::Msb, 8).encode(&chunk).unwrap(),
            ZSTD => zstd::encode_all(&chunk[..], 3).unwrap(),
            _ => chunk,
        }
    }

    /// Encoded strips or tiles, in file order
    fn chunks(&self) -> Vec<Vec<u8>> {
        match self.tile_size {
            Some(tile) => {
                let mut chunks = Vec::new();
                for ty in (0..self.height).step_by(tile as usize) {
                    for tx in (0..self.width).step_by(tile as usize) {
                        chunks.push(self.encode_chunk(self.block(tx, ty, tile, tile), tile as usize));
                    }
                }
                chunks
            }
            None => {
                let rows = self.rows_per_strip.unwrap_or(self.height);
                (0..self.height)
                    .step_by(rows as usize)
                    .map(|row| {
                        let strip_rows = rows.min(self.height - row);
                        self.encode_chunk(self.block(0, row, self.width, strip_rows), self.width as usize)
                    })
                    .collect()
            }
        }
    }

    /// Serializes the fixture: header, pixel chunks, IFD, long tag values
    pub fn to_bytes(&self) -> Vec<u8> {
        let chunks = self.chunks();

        let mut offsets = Vec::new();
        let mut counts = Vec::new();
        let mut position = 8u32;
        for chunk in &chunks {
            offsets.push(position);
            counts.push(chunk.len() as u32);
            position += chunk.len() as u32;
        }
        let ifd_offset = position;

        let mut entries: Vec<(u16, u16, u32, Vec<u8>)> = vec![
            (IMAGE_WIDTH, LONG, 1, longs(&[self.width])),
            (IMAGE_LENGTH, LONG, 1, longs(&[self.height])),
            (BITS_PER_SAMPLE, SHORT, 1, shorts(&[self.bits_per_sample])),
            (COMPRESSION, SHORT, 1, shorts(&[self.compression])),
            (SAMPLES_PER_PIXEL, SHORT, 1, shorts(&[1])),
            (SAMPLE_FORMAT, SHORT, 1, shorts(&[self.sample_format])),
            (MODEL_PIXEL_SCALE, DOUBLE, 3, doubles(&[self.pixel_size.0, self.pixel_size.1, 0.0])),
            (MODEL_TIEPOINT, DOUBLE, 6, doubles(&[0.0, 0.0, 0.0, self.origin.0, self.origin.1, 0.0])),
        ];

        if self.predictor {
            entries.push((PREDICTOR, SHORT, 1, shorts(&[2])));
        }

        match self.tile_size {
            Some(tile) => {
                entries.push((TILE_WIDTH, LONG, 1, longs(&[tile])));
                entries.push((TILE_LENGTH, LONG, 1, longs(&[tile])));
                entries.push((TILE_OFFSETS, LONG, offsets.len() as u32, longs(&offsets)));
                entries.push((TILE_BYTE_COUNTS, LONG, counts.len() as u32, longs(&counts)));
            }
            None => {
                let rows = self.rows_per_strip.unwrap_or(self.height);
                entries.push((STRIP_OFFSETS, LONG, offsets.len() as u32, longs(&offsets)));
                entries.push((ROWS_PER_STRIP, LONG, 1, longs(&[rows])));
                entries.push((STRIP_BYTE_COUNTS, LONG, counts.len() as u32, longs(&counts)));
            }
        }

        if let Some((key, code)) = self.crs_key {
            let directory = shorts(&[1, 1, 0, 2, 1025, 0, 1, 1, key, 0, 1, code]);
            entries.push((GEO_KEY_DIRECTORY, SHORT, 12, directory));
        }

        if let Some(nodata) = &self.nodata {
            let mut text = nodata.as_bytes().to_vec();
            text.push(0);
            entries.push((GDAL_NODATA, ASCII, text.len() as u32, text));
        }

        entries.sort_by_key(|entry| entry.0);

        let mut buffer = Vec::new();
        buffer.extend_from_slice(b"II");
        buffer.write_u16::<LittleEndian>(42).unwrap();
        buffer.write_u32::<LittleEndian>(ifd_offset).unwrap();
        for chunk in &chunks {
            buffer.extend_from_slice(chunk);
        }

        let mut data_offset = ifd_offset + 2 + 12 * entries.len() as u32 + 4;
        let mut data_area = Vec::new();

        buffer.write_u16::<LittleEndian>(entries.len() as u16).unwrap();
        for (tag, field_type, count, data) in &entries {
            buffer.write_u16::<LittleEndian>(*tag).unwrap();
            buffer.write_u16::<LittleEndian>(*field_type).unwrap();
            buffer.write_u32::<LittleEndian>(*count).unwrap();
            if data.len() <= 4 {
                let mut inline = data.clone();
                inline.resize(4, 0);
                buffer.extend_from_slice(&inline);
            } else {
                buffer.write_u32::<LittleEndian>(data_offset).unwrap();
                data_area.extend_from_slice(data);
                data_offset += data.len() as u32;
            }
        }
        buffer.write_u32::<LittleEndian>(0).unwrap();
        buffer.extend_from_slice(&data_area);

        buffer
    }
}

fn shorts(values: &[u16]) -> Vec<u8> {
    let mut data = Vec::new();
    for v in values {
        data.write_u16::<LittleEndian>(*v).unwrap();
    }
    data
}

fn longs(values: &[u32]) -> Vec<u8> {
    let mut data = Vec::new();
    for v in values {
        data.write_u32::<LittleEndian>(*v).unwrap();
    }
    data
}

fn doubles(values: &[f64]) -> Vec<u8> {
    let mut data = Vec::new();
    for v in values {
        data.write_f64::<LittleEndian>(*v).unwrap();
    }
    data
}
