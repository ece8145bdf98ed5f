//! Milling tools and their processing order.

use serde::{Deserialize, Serialize};

/// A flat-ended circular mill, projected onto the image grid as a disc.
///
/// The effective radii are expressed in pixels and may differ per axis when
/// the image pixel aspect does not match the physical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Nominal tool diameter in physical units (mm).
    pub diameter: f64,
    /// Effective radius along X, in pixels.
    pub x_radius: f64,
    /// Effective radius along Y, in pixels.
    pub y_radius: f64,
}

impl Tool {
    /// Derive a tool from its nominal diameter and the pixels-per-unit
    /// scale factors of the two image axes.
    pub fn from_diameter(diameter: f64, x_scale: f64, y_scale: f64) -> Self {
        Self {
            diameter,
            x_radius: diameter / 2.0 * x_scale,
            y_radius: diameter / 2.0 * y_scale,
        }
    }

    /// Sort tools strictly largest-diameter-first.
    ///
    /// Smaller tools rely on the mask state left behind by larger ones, so
    /// this order is fixed once before any processing begins.
    pub fn sort_largest_first(tools: &mut [Tool]) {
        tools.sort_by(|a, b| {
            b.diameter
                .partial_cmp(&a.diameter)
                .expect("tool diameters are finite")
        });
    }
}
