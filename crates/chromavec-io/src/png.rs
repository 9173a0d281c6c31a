//! PNG image format support

use crate::{IoError, IoResult};
use chromavec_core::Raster;
use png::{BitDepth, ColorType, Decoder, Encoder};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image.
///
/// Accepts 8-bit grayscale, grayscale+alpha, RGB and RGBA input; alpha
/// is dropped. Returns a 1-channel raster for grayscale sources and a
/// 3-channel raster otherwise.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Raster<u8>> {
    let decoder = Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG bit depth: {:?} (only 8-bit channels are supported)",
            bit_depth
        )));
    }

    // (samples per source pixel, channels in the output raster)
    let (samples, channels) = match color_type {
        ColorType::Grayscale => (1usize, 1u32),
        ColorType::GrayscaleAlpha => (2, 1),
        ColorType::Rgb => (3, 3),
        ColorType::Rgba => (4, 3),
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG colour type: {:?}",
                color_type
            )));
        }
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    let mut raster = Raster::new(width, height, channels)?;
    for y in 0..height {
        let row = &data[y as usize * bytes_per_row..];
        for x in 0..width {
            let src = &row[x as usize * samples..];
            let dst = raster.pixel_mut(x, y);
            for c in 0..channels as usize {
                dst[c] = src[c];
            }
        }
    }

    Ok(raster)
}

/// Write a raster as an 8-bit PNG.
///
/// A 1-channel raster becomes a grayscale PNG, a 3-channel raster an
/// RGB PNG; channel values are stored exactly.
pub fn write_png<W: Write>(raster: &Raster<u8>, writer: W) -> IoResult<()> {
    let color_type = match raster.channels() {
        1 => ColorType::Grayscale,
        _ => ColorType::Rgb,
    };

    let mut encoder = Encoder::new(writer, raster.width(), raster.height());
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(raster.data())
        .map_err(|e| IoError::EncodeError(format!("PNG encode error: {}", e)))?;

    Ok(())
}
