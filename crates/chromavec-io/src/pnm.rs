//! PNM (Portable Any Map) format support
//!
//! Reads and writes binary PGM (P5) and PPM (P6). ASCII variants
//! (P1/P2/P3), PBM and PAM are not supported, and neither are sources
//! with a maxval above 255.

use crate::{IoError, IoResult};
use chromavec_core::Raster;
use std::io::{BufRead, Read, Write};

/// Read one whitespace-delimited header token, skipping `#` comments.
fn read_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = String::new();
    let mut byte = [0u8; 1];

    loop {
        if reader.read(&mut byte)? == 0 {
            if token.is_empty() {
                return Err(IoError::InvalidData("truncated PNM header".into()));
            }
            return Ok(token);
        }

        match byte[0] {
            b'#' => {
                // Comment runs to end of line
                let mut discard = String::new();
                reader.read_line(&mut discard)?;
            }
            b if b.is_ascii_whitespace() => {
                if !token.is_empty() {
                    return Ok(token);
                }
            }
            b => token.push(b as char),
        }
    }
}

fn parse_dimension(token: &str) -> IoResult<u32> {
    token
        .parse::<u32>()
        .map_err(|_| IoError::InvalidData(format!("bad PNM header value: {token:?}")))
}

/// Read a binary PNM image (P5 or P6).
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<Raster<u8>> {
    let magic = read_token(&mut reader)?;
    let channels: u32 = match magic.as_str() {
        "P5" => 1,
        "P6" => 3,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNM variant: {magic:?}"
            )));
        }
    };

    let width = parse_dimension(&read_token(&mut reader)?)?;
    let height = parse_dimension(&read_token(&mut reader)?)?;
    let maxval = parse_dimension(&read_token(&mut reader)?)?;
    if maxval == 0 || maxval > 255 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNM maxval: {maxval}"
        )));
    }

    let len = width as usize * height as usize * channels as usize;
    let mut data = vec![0u8; len];
    reader.read_exact(&mut data).map_err(|_| {
        IoError::InvalidData(format!(
            "truncated PNM pixel data: expected {len} bytes"
        ))
    })?;

    Ok(Raster::from_vec(width, height, channels, data)?)
}

/// Write a raster as binary PNM: P5 for 1 channel, P6 for 3.
pub fn write_pnm<W: Write>(raster: &Raster<u8>, mut writer: W) -> IoResult<()> {
    let magic = match raster.channels() {
        1 => "P5",
        _ => "P6",
    };

    write!(writer, "{magic}\n{} {}\n255\n", raster.width(), raster.height())?;
    writer.write_all(raster.data())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromavec_test::salt_noise;
    use std::io::Cursor;

    #[test]
    fn test_ppm_roundtrip_is_exact() {
        let img = salt_noise(9, 11, [200, 100, 50], 30, 3);

        let mut encoded = Vec::new();
        write_pnm(&img, &mut encoded).unwrap();
        assert!(encoded.starts_with(b"P6\n9 11\n255\n"));

        let decoded = read_pnm(Cursor::new(encoded)).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_pgm_roundtrip_is_exact() {
        let data: Vec<u8> = (0..24).map(|i| (i * 11) as u8).collect();
        let img = Raster::from_vec(6, 4, 1, data).unwrap();

        let mut encoded = Vec::new();
        write_pnm(&img, &mut encoded).unwrap();
        assert!(encoded.starts_with(b"P5\n6 4\n255\n"));

        let decoded = read_pnm(Cursor::new(encoded)).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_header_comments_are_skipped() {
        let mut encoded: Vec<u8> = b"P5\n# a comment\n2 2\n# another\n255\n".to_vec();
        encoded.extend_from_slice(&[1, 2, 3, 4]);

        let img = read_pnm(Cursor::new(encoded)).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
        assert_eq!(img.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_rejects_ascii_variant_and_high_maxval() {
        assert!(matches!(
            read_pnm(Cursor::new(b"P3\n1 1\n255\n1 2 3\n".to_vec())),
            Err(IoError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            read_pnm(Cursor::new(b"P5\n1 1\n65535\n".to_vec())),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_truncated_data_is_invalid() {
        assert!(matches!(
            read_pnm(Cursor::new(b"P6\n2 2\n255\nabc".to_vec())),
            Err(IoError::InvalidData(_))
        ));
    }
}
