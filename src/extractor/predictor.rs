//! Horizontal differencing predictor (Predictor = 2)

use byteorder::{BigEndian, ByteOrder as ByteOrderExt, LittleEndian};

use crate::io::byte_order::ByteOrder;

/// Reverses horizontal differencing in place
///
/// `data` holds whole rows of `row_samples` samples, each
/// `bytes_per_sample` wide and stored in `byte_order`. Additions wrap,
/// matching how the encoder subtracted.
pub fn undo_horizontal_differencing(data: &mut [u8], row_samples: usize, bytes_per_sample: usize, byte_order: ByteOrder) {
    match byte_order {
        ByteOrder::LittleEndian => undo_rows::<LittleEndian>(data, row_samples, bytes_per_sample),
        ByteOrder::BigEndian => undo_rows::<BigEndian>(data, row_samples, bytes_per_sample),
    }
}

fn undo_rows<B: ByteOrderExt>(data: &mut [u8], row_samples: usize, bytes_per_sample: usize) {
    let row_bytes = row_samples * bytes_per_sample;
    if row_bytes == 0 {
        return;
    }

    for row in data.chunks_exact_mut(row_bytes) {
        match bytes_per_sample {
            1 => {
                for i in 1..row_samples {
                    row[i] = row[i].wrapping_add(row[i - 1]);
                }
            }
            2 => {
                for i in 1..row_samples {
                    let prev = B::read_u16(&row[(i - 1) * 2..]);
                    let cur = B::read_u16(&row[i * 2..]);
                    B::write_u16(&mut row[i * 2..], cur.wrapping_add(prev));
                }
            }
            4 => {
                for i in 1..row_samples {
                    let prev = B::read_u32(&row[(i - 1) * 4..]);
                    let cur = B::read_u32(&row[i * 4..]);
                    B::write_u32(&mut row[i * 4..], cur.wrapping_add(prev));
                }
            }
            8 => {
                for i in 1..row_samples {
                    let prev = B::read_u64(&row[(i - 1) * 8..]);
                    let cur = B::read_u64(&row[i * 8..]);
                    B::write_u64(&mut row[i * 8..], cur.wrapping_add(prev));
                }
            }
            _ => {}
        }
    }
}
