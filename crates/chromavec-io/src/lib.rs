//! chromavec-io - Image I/O for chromavec
//!
//! Reads and writes the 8-bit rasters the filter crate operates on.
//! Supported formats: PNG (via the `png` crate) and binary PNM
//! (PGM P5 / PPM P6). Channel values round-trip exactly; sources with
//! more than 8 bits per channel are rejected rather than quantised.

mod error;
mod format;
pub mod png;
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::ImageFormat;

use chromavec_core::Raster;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

/// Read an image from a file, identifying the format from its leading
/// bytes.
///
/// # Errors
///
/// Fails on I/O errors, unrecognised formats, and sources that cannot
/// be represented as an 8-bit raster.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Raster<u8>> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);

    let format = ImageFormat::sniff(reader.fill_buf()?);
    match format {
        ImageFormat::Png => png::read_png(reader),
        ImageFormat::Pnm => pnm::read_pnm(reader),
        ImageFormat::Unknown => Err(IoError::UnsupportedFormat(format!(
            "unrecognised image file: {}",
            path.as_ref().display()
        ))),
    }
}

/// Write an image to a file in the given format.
///
/// The format is validated before the file is created, so an
/// unsupported request leaves no partial output behind.
///
/// # Errors
///
/// Fails on I/O errors or if the format is [`ImageFormat::Unknown`].
pub fn write_image<P: AsRef<Path>>(
    raster: &Raster<u8>,
    path: P,
    format: ImageFormat,
) -> IoResult<()> {
    if format == ImageFormat::Unknown {
        return Err(IoError::UnsupportedFormat(
            "cannot write an image with an unknown format".into(),
        ));
    }

    let writer = BufWriter::new(File::create(path.as_ref())?);
    match format {
        ImageFormat::Png => png::write_png(raster, writer),
        ImageFormat::Pnm => pnm::write_pnm(raster, writer),
        ImageFormat::Unknown => unreachable!(),
    }
}
