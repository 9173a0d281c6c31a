//! Parallel per-pixel filter execution
//!
//! Every filter in this crate is expressed as a [`FilterOperator`]: a
//! small object that declares its input and output pixel layout and
//! computes one output colour per coordinate. [`apply`] runs an operator
//! over a whole raster, partitioning the output into horizontal bands
//! that are filled concurrently.
//!
//! Each band works on a fresh clone of the operator, so operators with
//! scratch buffers never share mutable state across bands. Within a band
//! pixels are visited in row-major order; across bands there is no
//! ordering at all, and because every output pixel depends only on the
//! read-only source grid, the result is identical for any band size or
//! thread count.

use chromavec_core::{ColorVector, Element, PixelEncoding, PixelGrid, Raster};
use rayon::prelude::*;

use crate::error::{FilterError, FilterResult};

/// Rows per parallel band.
const BAND_ROWS: usize = 32;

/// A per-pixel filtering operator.
///
/// The `eval` method receives the coordinate of the output pixel and the
/// source grid, and returns the output colour. How that colour lands in
/// the destination depends on the declared output channel count: one
/// channel stores red only, two store red and green, three or four store
/// red, green and blue.
pub trait FilterOperator: Clone + Send + Sync {
    /// Source element type
    type In: Element;
    /// Destination element type
    type Out: Element;

    /// Channels the source raster must have
    const IN_CHANNELS: u32;
    /// Channels the destination raster is allocated with
    const OUT_CHANNELS: u32;

    /// Compute the output colour for the pixel at `(x, y)`.
    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, Self::In>) -> ColorVector<Self::Out>;
}

/// Store a result colour into the declared number of output channels.
#[inline]
fn store<T: Element>(pixel: &mut [T], color: ColorVector<T>, channels: u32) {
    match channels {
        1 => {
            pixel[0] = color.red;
        }
        2 => {
            pixel[0] = color.red;
            pixel[1] = color.green;
        }
        _ => {
            pixel[0] = color.red;
            pixel[1] = color.green;
            pixel[2] = color.blue;
        }
    }
}

/// Apply a filter operator onto an image.
///
/// Verifies the source layout against the operator's declared input
/// contract, allocates a matching output raster, and evaluates the
/// operator for every pixel in parallel. The supplied operator acts as a
/// prototype: each band clones it before processing, so any internal
/// buffers stay band-local.
///
/// # Errors
///
/// Returns [`FilterError::EncodingMismatch`] if the source channel count
/// differs from `Op::IN_CHANNELS`. Nothing is computed in that case.
pub fn apply<Op: FilterOperator>(src: &Raster<Op::In>, op: &Op) -> FilterResult<Raster<Op::Out>> {
    if src.channels() != Op::IN_CHANNELS {
        return Err(FilterError::EncodingMismatch {
            expected: PixelEncoding::new(<Op::In as Element>::KIND, Op::IN_CHANNELS),
            actual: src.encoding(),
        });
    }

    let width = src.width();
    let mut out: Raster<Op::Out> = Raster::new(width, src.height(), Op::OUT_CHANNELS)?;
    let out_stride = out.stride();
    let out_channels = Op::OUT_CHANNELS as usize;
    let grid = src.as_grid();

    out.data_mut()
        .par_chunks_mut(BAND_ROWS * out_stride)
        .enumerate()
        .for_each(|(band, chunk)| {
            // One operator instance per band; scratch state never crosses
            // a band boundary.
            let mut op = op.clone();

            let y_start = (band * BAND_ROWS) as u32;
            let band_rows = (chunk.len() / out_stride) as u32;

            for dy in 0..band_rows {
                let y = y_start + dy;
                let row = &mut chunk[dy as usize * out_stride..][..out_stride];
                for x in 0..width {
                    let color = op.eval(x, y, &grid);
                    let i = x as usize * out_channels;
                    store(&mut row[i..i + out_channels], color, Op::OUT_CHANNELS);
                }
            }
        });

    Ok(out)
}

/// Validate an order-statistic filter window width: odd and at least 3.
pub(crate) fn check_window(width: u32) -> FilterResult<()> {
    if width < 3 || width % 2 == 0 {
        return Err(FilterError::InvalidParameters(format!(
            "filter window width must be odd and >= 3, got {width}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Copies the source pixel through unchanged.
    #[derive(Debug, Clone, Copy, Default)]
    struct Identity;

    impl FilterOperator for Identity {
        type In = u8;
        type Out = u8;
        const IN_CHANNELS: u32 = 3;
        const OUT_CHANNELS: u32 = 3;

        fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, u8>) -> ColorVector<u8> {
            src.color(x, y)
        }
    }

    /// Collapses a colour pixel to its red channel.
    #[derive(Debug, Clone, Copy, Default)]
    struct RedOnly;

    impl FilterOperator for RedOnly {
        type In = u8;
        type Out = u8;
        const IN_CHANNELS: u32 = 3;
        const OUT_CHANNELS: u32 = 1;

        fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, u8>) -> ColorVector<u8> {
            let c = src.color(x, y);
            ColorVector::new(c.red, c.red, c.red)
        }
    }

    fn test_image(width: u32, height: u32) -> Raster<u8> {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.push((x * 7 + y) as u8);
                data.push((x + y * 11) as u8);
                data.push((x * 3 + y * 5) as u8);
            }
        }
        Raster::from_vec(width, height, 3, data).unwrap()
    }

    #[test]
    fn test_identity_roundtrip() {
        let img = test_image(17, 9);
        let out = apply(&img, &Identity).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_identity_taller_than_one_band() {
        // More rows than BAND_ROWS so several bands actually run
        let img = test_image(5, 100);
        let out = apply(&img, &Identity).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_single_channel_store() {
        let img = test_image(6, 4);
        let out = apply(&img, &RedOnly).unwrap();
        assert_eq!(out.channels(), 1);
        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(out.pixel(x, y)[0], img.pixel(x, y)[0]);
            }
        }
    }

    #[test]
    fn test_encoding_mismatch_rejected() {
        let gray: Raster<u8> = Raster::new(4, 4, 1).unwrap();
        let result = apply(&gray, &Identity);
        assert!(matches!(
            result,
            Err(FilterError::EncodingMismatch { .. })
        ));
    }

    #[test]
    fn test_deterministic_across_thread_counts() {
        let img = test_image(33, 70);
        let parallel = apply(&img, &Identity).unwrap();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();
        let serial = pool.install(|| apply(&img, &Identity).unwrap());

        assert_eq!(parallel, serial);
    }

    #[test]
    fn test_check_window() {
        assert!(check_window(3).is_ok());
        assert!(check_window(5).is_ok());
        assert!(check_window(7).is_ok());
        assert!(check_window(1).is_err());
        assert!(check_window(2).is_err());
        assert!(check_window(4).is_err());
    }
}
