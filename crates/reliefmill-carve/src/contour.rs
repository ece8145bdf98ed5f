//! Contour extraction: closed boundary polygons from a binary mask.
//!
//! Thin wrapper around Suzuki-Abe border following
//! (`imageproc::contours::find_contours`). Polygons are returned largest
//! enclosed area first; ties keep the tracer's order, so identical masks
//! always produce identical sequences.

use imageproc::contours::Contour;
use reliefmill_core::BinaryMask;

/// A closed boundary polygon on the pixel grid.
///
/// Points are ordered along the border; the last point implicitly connects
/// back to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    /// Integer pixel coordinates along the border.
    pub points: Vec<(u32, u32)>,
}

impl Polygon {
    /// Enclosed area via the shoelace formula.
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut doubled: i64 = 0;
        for (i, &(x0, y0)) in self.points.iter().enumerate() {
            let (x1, y1) = self.points[(i + 1) % self.points.len()];
            doubled += x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64;
        }
        doubled.abs() as f64 / 2.0
    }
}

/// Extract the boundary polygons of all non-material regions in the mask,
/// ordered by enclosed area descending.
///
/// Inner (hole) borders are included, so the edges of remaining material
/// pockets show up as their own polygons. An empty result for a non-empty
/// mask simply means there is no contour to cut.
pub fn extract_contours(mask: &BinaryMask) -> Vec<Polygon> {
    let image = mask.to_gray_image();
    let contours: Vec<Contour<u32>> = imageproc::contours::find_contours(&image);

    let mut polygons: Vec<Polygon> = contours
        .into_iter()
        .filter(|c| !c.points.is_empty())
        .map(|c| Polygon {
            points: c.points.into_iter().map(|p| (p.x, p.y)).collect(),
        })
        .collect();

    // Stable sort keeps the tracer's tie order deterministic.
    polygons.sort_by(|a, b| {
        b.area()
            .partial_cmp(&a.area())
            .expect("polygon areas are finite")
    });
    polygons
}
