//! Binary machining masks.
//!
//! A [`BinaryMask`] tracks, per pixel, whether material still has to be
//! removed ([`MATERIAL`]) or is already clear ([`CLEAR`]). Masks are the
//! working state of the offset engine: level rendering produces them,
//! ellipse stamping grows the clear region, and boundary detection drives
//! the onion-peel iteration.
//!
//! The grid is kept as a flat row-major byte arena rather than nested
//! containers; the per-ring full-image scans dominate planning cost.

use image::GrayImage;

use crate::heightmap::ElevationMatrix;

/// Mask value for material that still has to be removed.
pub const MATERIAL: u8 = 0;

/// Mask value for clear (already machined or never-to-cut) area.
pub const CLEAR: u8 = 255;

/// Offsets of the 8-connected neighborhood.
const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A 2D byte mask with machined/unmachined state per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    length: u32,
    data: Vec<u8>,
}

impl BinaryMask {
    /// Create a mask filled with a single color.
    pub fn filled(width: u32, length: u32, color: u8) -> Self {
        Self {
            width,
            length,
            data: vec![color; (width as usize) * (length as usize)],
        }
    }

    /// Render the removal mask for one elevation level.
    ///
    /// For level > 0 a pixel is material when its elevation lies strictly
    /// below the level (still needs deeper milling on this pass). Level 0 is
    /// the final floor pass and only matches pixels at exactly elevation 0,
    /// so already-cleared deeper neighbors are not re-touched.
    pub fn for_level(matrix: &ElevationMatrix, level: u8) -> Self {
        let width = matrix.width();
        let length = matrix.length();
        let mut mask = Self::filled(width, length, CLEAR);
        for y in 0..length {
            for x in 0..width {
                let elevation = matrix.get(x, y);
                let material = if level > 0 {
                    elevation < level
                } else {
                    elevation == 0
                };
                if material {
                    mask.set(x, y, MATERIAL);
                }
            }
        }
        mask
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Length in pixels.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Value at pixel (x, y).
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[(y * self.width + x) as usize]
    }

    /// Set pixel (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: u8) {
        self.data[(y * self.width + x) as usize] = color;
    }

    /// Number of pixels carrying the given color.
    pub fn count_of(&self, color: u8) -> usize {
        self.data.iter().filter(|&&v| v == color).count()
    }

    /// True when pixel (x, y) carries `color` and touches a different color.
    ///
    /// An out-of-bounds neighbor always counts as different, so pixels on
    /// the mask edge are boundaries of their own region.
    pub fn is_boundary(&self, x: u32, y: u32, color: u8) -> bool {
        if self.get(x, y) != color {
            return false;
        }
        for (dx, dy) in NEIGHBORS {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.length as i64 {
                return true;
            }
            if self.get(nx as u32, ny as u32) != color {
                return true;
            }
        }
        false
    }

    /// Count boundary pixels of the given color over the whole mask.
    pub fn boundary_count(&self, color: u8) -> usize {
        let mut count = 0;
        for y in 0..self.length {
            for x in 0..self.width {
                if self.is_boundary(x, y, color) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Stamp a filled axis-aligned ellipse centered on (cx, cy).
    ///
    /// The ellipse is inscribed in the integer bounding box
    /// `[ceil(cx - rx), floor(cx + rx)] x [ceil(cy - ry), floor(cy + ry)]`,
    /// which keeps stamps deterministic under fractional radii. Degenerate
    /// axes collapse to a line or single pixel; the stamp is clipped to the
    /// mask. A stamp either fully applies or not at all, so growth stays
    /// monotonic.
    pub fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: u8) {
        let x0 = (cx - rx).ceil() as i64;
        let x1 = (cx + rx).floor() as i64;
        let y0 = (cy - ry).ceil() as i64;
        let y1 = (cy + ry).floor() as i64;
        if x1 < x0 || y1 < y0 {
            return;
        }

        let a = (x1 - x0) as f64 / 2.0;
        let b = (y1 - y0) as f64 / 2.0;
        let mx = (x0 + x1) as f64 / 2.0;
        let my = (y0 + y1) as f64 / 2.0;

        for y in y0.max(0)..=y1.min(self.length as i64 - 1) {
            for x in x0.max(0)..=x1.min(self.width as i64 - 1) {
                let dx = x as f64 - mx;
                let dy = y as f64 - my;
                let nx = if a > 0.0 { dx / a } else { dx };
                let ny = if b > 0.0 { dy / b } else { dy };
                if nx * nx + ny * ny <= 1.0 + 1e-9 {
                    self.set(x as u32, y as u32, color);
                }
            }
        }
    }

    /// View the mask as a grayscale image for the contour tracer.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_raw(self.width, self.length, self.data.clone())
            .expect("mask buffer matches its dimensions")
    }
}
