//! Raster containers and borrowed pixel views
//!
//! [`Raster`] is the owned image type: a flat row-major buffer of typed
//! elements with one or three interleaved channels. [`PixelGrid`] is the
//! read-only, non-owning view a filter works against for the duration of
//! one call.
//!
//! The set of supported pixel encodings is a small closed table,
//! (`u8` | `i32` | `f32`) x (1 | 3 channels), described by
//! [`PixelEncoding`]. A filter operator declares its input and output
//! contract in those terms; the element half is carried in the type and
//! the channel half is verified before any pixel is touched.

use crate::error::{Error, Result};
use crate::vector::{Channel, ColorVector};

/// Element type of a raster buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 8-bit unsigned
    U8,
    /// 32-bit signed integer
    I32,
    /// 32-bit floating point
    F32,
}

/// A buffer element usable as a raster channel.
pub trait Element: Channel + PartialOrd {
    /// The runtime tag for this element type.
    const KIND: ElementKind;
}

impl Element for u8 {
    const KIND: ElementKind = ElementKind::U8;
}

impl Element for i32 {
    const KIND: ElementKind = ElementKind::I32;
}

impl Element for f32 {
    const KIND: ElementKind = ElementKind::F32;
}

/// A (element type, channel count) pair identifying a raster layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelEncoding {
    /// Element type of the buffer
    pub element: ElementKind,
    /// Interleaved channels per pixel
    pub channels: u32,
}

impl PixelEncoding {
    /// Construct an encoding descriptor.
    pub const fn new(element: ElementKind, channels: u32) -> Self {
        Self { element, channels }
    }

    /// Whether this encoding is one of the six supported layouts.
    pub const fn is_supported(&self) -> bool {
        matches!(self.channels, 1 | 3)
    }
}

/// An owned raster image.
///
/// Pixels are stored row-major with interleaved channels; the row stride
/// is always `width * channels` (no padding).
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T: Element> {
    width: u32,
    height: u32,
    channels: u32,
    data: Vec<T>,
}

impl<T: Element> Raster<T> {
    /// Create a zero-filled raster.
    ///
    /// # Errors
    ///
    /// Fails if either dimension is zero or the channel count is not
    /// 1 or 3.
    pub fn new(width: u32, height: u32, channels: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if !PixelEncoding::new(T::KIND, channels).is_supported() {
            return Err(Error::UnsupportedChannels(channels));
        }
        let len = width as usize * height as usize * channels as usize;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![T::default(); len],
        })
    }

    /// Create a raster from an existing buffer.
    ///
    /// # Errors
    ///
    /// Fails on invalid geometry or if the buffer length does not equal
    /// `width * height * channels`.
    pub fn from_vec(width: u32, height: u32, channels: u32, data: Vec<T>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if !PixelEncoding::new(T::KIND, channels).is_supported() {
            return Err(Error::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved channels per pixel.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Elements per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// The layout descriptor for this raster.
    #[inline]
    pub fn encoding(&self) -> PixelEncoding {
        PixelEncoding::new(T::KIND, self.channels)
    }

    /// The raw buffer.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// The raw buffer, mutable.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// The channel slice of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[T] {
        let c = self.channels as usize;
        let i = y as usize * self.stride() + x as usize * c;
        &self.data[i..i + c]
    }

    /// The channel slice of the pixel at `(x, y)`, mutable.
    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [T] {
        let c = self.channels as usize;
        let i = y as usize * self.stride() + x as usize * c;
        &mut self.data[i..i + c]
    }

    /// The colour vector of the pixel at `(x, y)`.
    #[inline]
    pub fn color(&self, x: u32, y: u32) -> ColorVector<T> {
        ColorVector::from_slice(self.pixel(x, y), self.channels)
    }

    /// Borrow the raster as a read-only grid for one filter call.
    #[inline]
    pub fn as_grid(&self) -> PixelGrid<'_, T> {
        PixelGrid {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }
}

/// A read-only, non-owning view of a raster buffer.
#[derive(Debug, Clone, Copy)]
pub struct PixelGrid<'a, T: Element> {
    data: &'a [T],
    width: u32,
    height: u32,
    channels: u32,
}

impl<'a, T: Element> PixelGrid<'a, T> {
    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved channels per pixel.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// The layout descriptor for the viewed buffer.
    #[inline]
    pub fn encoding(&self) -> PixelEncoding {
        PixelEncoding::new(T::KIND, self.channels)
    }

    /// The channel slice of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &'a [T] {
        let c = self.channels as usize;
        let stride = self.width as usize * c;
        let i = y as usize * stride + x as usize * c;
        &self.data[i..i + c]
    }

    /// The colour vector of the pixel at `(x, y)`.
    #[inline]
    pub fn color(&self, x: u32, y: u32) -> ColorVector<T> {
        ColorVector::from_slice(self.pixel(x, y), self.channels)
    }

    /// Clamp a signed coordinate onto the grid (edge replication).
    #[inline]
    pub fn clamp(&self, x: i64, y: i64) -> (u32, u32) {
        (
            x.clamp(0, self.width as i64 - 1) as u32,
            y.clamp(0, self.height as i64 - 1) as u32,
        )
    }

    /// The colour vector at a signed coordinate, clamped to the grid.
    #[inline]
    pub fn clamped_color(&self, x: i64, y: i64) -> ColorVector<T> {
        let (cx, cy) = self.clamp(x, y);
        self.color(cx, cy)
    }
}
