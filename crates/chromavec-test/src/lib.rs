//! chromavec-test - Test support for the chromavec workspace
//!
//! Provides a small regression-test harness ([`RegParams`]) and
//! deterministic synthetic raster builders used by the unit and
//! regression tests across the workspace. Everything here is fully
//! reproducible: the noise generator is a fixed linear congruential
//! generator seeded by the caller.

mod params;

pub use params::RegParams;

use chromavec_core::Raster;

/// A raster filled with one colour.
pub fn uniform(width: u32, height: u32, color: [u8; 3]) -> Raster<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&color);
    }
    Raster::from_vec(width, height, 3, data).unwrap()
}

/// A two-tone raster split by a vertical boundary at `width / 2`:
/// columns left of the boundary hold `left`, the rest hold `right`.
pub fn vertical_step(width: u32, height: u32, left: [u8; 3], right: [u8; 3]) -> Raster<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..height {
        for x in 0..width {
            data.extend_from_slice(if x < width / 2 { &left } else { &right });
        }
    }
    Raster::from_vec(width, height, 3, data).unwrap()
}

/// A two-tone raster split by a horizontal boundary at `height / 2`:
/// rows above the boundary hold `top`, the rest hold `bottom`.
pub fn horizontal_step(width: u32, height: u32, top: [u8; 3], bottom: [u8; 3]) -> Raster<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        let tone = if y < height / 2 { &top } else { &bottom };
        for _ in 0..width {
            data.extend_from_slice(tone);
        }
    }
    Raster::from_vec(width, height, 3, data).unwrap()
}

/// A uniform raster with `count` impulse-noise pixels at pseudo-random
/// positions and colours, generated by a fixed LCG so runs are
/// repeatable for any given seed.
pub fn salt_noise(width: u32, height: u32, base: [u8; 3], count: u32, seed: u64) -> Raster<u8> {
    let mut img = uniform(width, height, base);
    let mut state = seed;

    // LCG constants from Numerical Recipes
    let mut next = move || {
        const A: u64 = 1664525;
        const C: u64 = 1013904223;
        state = state.wrapping_mul(A).wrapping_add(C);
        (state >> 16) as u32
    };

    for _ in 0..count {
        let x = next() % width;
        let y = next() % height;
        let pixel = [
            (next() % 256) as u8,
            (next() % 256) as u8,
            (next() % 256) as u8,
        ];
        img.pixel_mut(x, y).copy_from_slice(&pixel);
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_fill() {
        let img = uniform(3, 2, [1, 2, 3]);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(img.pixel(x, y), &[1, 2, 3]);
            }
        }
    }

    #[test]
    fn test_step_boundaries() {
        let v = vertical_step(4, 2, [0, 0, 0], [9, 9, 9]);
        assert_eq!(v.pixel(1, 0), &[0, 0, 0]);
        assert_eq!(v.pixel(2, 0), &[9, 9, 9]);

        let h = horizontal_step(2, 4, [0, 0, 0], [9, 9, 9]);
        assert_eq!(h.pixel(0, 1), &[0, 0, 0]);
        assert_eq!(h.pixel(0, 2), &[9, 9, 9]);
    }

    #[test]
    fn test_salt_noise_is_deterministic() {
        let a = salt_noise(16, 16, [128, 128, 128], 20, 42);
        let b = salt_noise(16, 16, [128, 128, 128], 20, 42);
        assert_eq!(a, b);

        let c = salt_noise(16, 16, [128, 128, 128], 20, 43);
        assert_ne!(a, c);
    }
}
