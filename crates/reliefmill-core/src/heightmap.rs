//! Heightmap normalization and elevation level extraction.
//!
//! A heightmap is a grayscale image where pixel intensity encodes physical
//! elevation: 0 is the deepest cut, 255 is untouched stock. The
//! [`ElevationMatrix`] holds the normalized single-channel view of the
//! source image and derives the set of elevation levels that need machining.

use image::DynamicImage;

/// Elevation value reserved for untouched stock (background).
pub const BACKGROUND: u8 = 255;

/// A single-channel elevation grid, one entry per source pixel.
///
/// Values are in 0..=255. The matrix is immutable after construction; the
/// planner reads it to render per-level masks but never writes back.
#[derive(Debug, Clone)]
pub struct ElevationMatrix {
    width: u32,
    length: u32,
    data: Vec<u8>,
}

impl ElevationMatrix {
    /// Normalize an RGB image into an elevation matrix by averaging the
    /// three channels of every pixel (integer mean, matching 8-bit output).
    pub fn from_image(img: &DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, length) = (rgb.width(), rgb.height());
        let data = rgb
            .pixels()
            .map(|p| {
                let sum = p.0[0] as u16 + p.0[1] as u16 + p.0[2] as u16;
                (sum / 3) as u8
            })
            .collect();
        Self {
            width,
            length,
            data,
        }
    }

    /// Build a matrix from raw row-major elevation values.
    ///
    /// Panics if `data.len() != width * length`.
    pub fn from_raw(width: u32, length: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width as usize) * (length as usize),
            "elevation data does not match dimensions"
        );
        Self {
            width,
            length,
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Length (height of the image) in pixels.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Elevation at pixel (x, y).
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[(y * self.width + x) as usize]
    }

    /// The distinct elevation levels present in the matrix, excluding the
    /// background value, sorted descending (shallowest first).
    ///
    /// Shallow levels are machined before deep ones so larger tools clear
    /// bulk material first. An all-background matrix yields an empty set.
    pub fn levels(&self) -> Vec<u8> {
        let mut seen = [false; 256];
        for &value in &self.data {
            seen[value as usize] = true;
        }
        (0..BACKGROUND)
            .rev()
            .filter(|&level| seen[level as usize])
            .collect()
    }
}
