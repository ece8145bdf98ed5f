//! Motion program synthesis.
//!
//! Turns one tool's accumulated contour segments into a complete numeric
//! control program. Commands are plain G-code text: G21 metric units, M3/M5
//! spindle control, G00 rapids, G01 feed moves, everything formatted to
//! three decimal places.
//!
//! The Z cursor is threaded through the synthesizer explicitly: it carries
//! across every segment of a tool and is never reset, so revisiting a
//! polygon group at a deeper level continues stepping down from where the
//! previous level finished.

use crate::carver::ToolpathSegment;
use crate::contour::Polygon;

/// Fixed retract height above the stock, in physical units.
const SAFE_RETRACT: &str = "G00 Z5";

/// Corner suppression margin, in pixels.
const BORDER_DELTA: f64 = 2.0;

/// Format a numeric field to exactly three decimals.
fn fflt(value: f64) -> String {
    format!("{:.3}", value)
}

/// Synthesizer state for one tool's program.
pub struct ProgramSynthesizer {
    width: f64,
    length: f64,
    x_scale: f64,
    y_scale: f64,
    z_scale: f64,
    height_mm: f64,
    feed_rate: Option<f64>,
    step_down: Option<f64>,
    z: f64,
}

impl ProgramSynthesizer {
    /// Create a synthesizer for an image of `width` x `length` pixels.
    ///
    /// `x_scale`/`y_scale` are pixels per physical unit; `z_scale` maps one
    /// 8-bit elevation step to physical units (height / 256). Scale factors
    /// must be positive; that is a documented precondition of the planner,
    /// not a runtime check.
    pub fn new(
        width: u32,
        length: u32,
        x_scale: f64,
        y_scale: f64,
        height_mm: f64,
        feed_rate: Option<f64>,
        step_down: Option<f64>,
    ) -> Self {
        Self {
            width: width as f64,
            length: length as f64,
            x_scale,
            y_scale,
            z_scale: height_mm / 256.0,
            height_mm,
            feed_rate,
            step_down,
            z: 0.0,
        }
    }

    /// Emit the full program for the given segments, in accumulation order.
    ///
    /// The framing (units, spindle start, retract, spindle stop) is always
    /// present, even for an empty plan.
    pub fn synthesize(mut self, segments: &[ToolpathSegment]) -> String {
        let mut gcode = String::new();
        gcode.push_str("G21\n");
        gcode.push_str("M3\n");
        gcode.push_str(SAFE_RETRACT);
        gcode.push('\n');

        for segment in segments {
            // Stock top is Z0; cut planes are negative depths.
            let max_z = segment.level as f64 * self.z_scale - self.height_mm;
            for polygon in &segment.polygons {
                self.cut_polygon(&mut gcode, polygon, max_z);
            }
        }

        gcode.push_str("M5\n");
        gcode
    }

    /// Cut one polygon down to `max_z`, one full perimeter traversal per
    /// depth increment.
    fn cut_polygon(&mut self, gcode: &mut String, polygon: &Polygon, max_z: f64) {
        if polygon.points.is_empty() {
            return;
        }
        let mut descending = true;
        while descending {
            match self.step_down {
                Some(step) => {
                    self.z -= step;
                    if self.z <= max_z {
                        self.z = max_z;
                        descending = false;
                    }
                }
                None => {
                    self.z = max_z;
                    descending = false;
                }
            }
            self.trace_pass(gcode, polygon, self.z);
        }
    }

    /// One retract/plunge/traverse cycle around the polygon at depth `z`.
    fn trace_pass(&self, gcode: &mut String, polygon: &Polygon, z: f64) {
        let mut drawing = false;
        let mut feed_pending = false;
        let mut last = (0.0, 0.0);

        for &(px, py) in &polygon.points {
            let flipped = self.length - py as f64;
            let physical = (px as f64 / self.x_scale, flipped / self.y_scale);

            if self.is_border_corner(px as f64, flipped) {
                // Corner artifact along the image edge: no cutting motion,
                // only the position pointer moves.
                if drawing {
                    gcode.push_str(&format!(
                        "G00 X{} Y{} Z5\n",
                        fflt(last.0),
                        fflt(last.1)
                    ));
                    drawing = false;
                }
                last = physical;
                continue;
            }

            if drawing {
                gcode.push_str(&format!(
                    "G01 X{} Y{} Z{}{}\n",
                    fflt(physical.0),
                    fflt(physical.1),
                    fflt(z),
                    self.take_feed_tag(&mut feed_pending),
                ));
            } else {
                gcode.push_str(&format!(
                    "G00 X{} Y{} Z5\n",
                    fflt(physical.0),
                    fflt(physical.1)
                ));
                gcode.push_str(&format!("G00 Z{}\n", fflt(z)));
                drawing = true;
                feed_pending = true;
            }
            last = physical;
        }

        if drawing {
            let (fx, fy) = polygon.points[0];
            gcode.push_str(&format!(
                "G01 X{} Y{} Z{}{}\n",
                fflt(fx as f64 / self.x_scale),
                fflt((self.length - fy as f64) / self.y_scale),
                fflt(z),
                self.take_feed_tag(&mut feed_pending),
            ));
            gcode.push_str(SAFE_RETRACT);
            gcode.push('\n');
        }
    }

    /// The feed-rate suffix for the first cutting move after an entry.
    fn take_feed_tag(&self, pending: &mut bool) -> String {
        if *pending {
            *pending = false;
            if let Some(feed) = self.feed_rate {
                return format!(" F{}", fflt(feed));
            }
        }
        String::new()
    }

    /// True when the point sits within the suppression margin of both a
    /// width boundary and a length boundary (Y already flipped).
    fn is_border_corner(&self, x: f64, y: f64) -> bool {
        (y <= BORDER_DELTA || y >= self.length - BORDER_DELTA)
            && (x <= BORDER_DELTA || x >= self.width - BORDER_DELTA)
    }
}
