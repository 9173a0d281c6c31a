//! Image file format identification

use std::path::Path;

/// Image file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Unknown format
    #[default]
    Unknown,
    /// PNG format
    Png,
    /// Binary PNM (PGM P5 / PPM P6)
    Pnm,
}

impl ImageFormat {
    /// Get the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Unknown => "dat",
            Self::Png => "png",
            Self::Pnm => "pnm",
        }
    }

    /// Guess the format from a file path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "png" => Self::Png,
            "pnm" | "pgm" | "ppm" => Self::Pnm,
            _ => Self::Unknown,
        }
    }

    /// Identify the format from a file's leading bytes.
    pub fn sniff(magic: &[u8]) -> Self {
        if magic.starts_with(&[0x89, b'P', b'N', b'G']) {
            Self::Png
        } else if magic.starts_with(b"P5") || magic.starts_with(b"P6") {
            Self::Pnm
        } else {
            Self::Unknown
        }
    }
}
