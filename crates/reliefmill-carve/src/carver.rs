//! The relief carving driver.
//!
//! Walks elevation levels (shallowest first) and tools (largest first),
//! running the offset engine for every combination, accumulating contour
//! segments per tool and maintaining the shared working mask within a
//! level. Programs are synthesized once per tool after planning finishes.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use reliefmill_core::{
    BinaryMask, CarveResult, ElevationMatrix, ParameterError, ParameterResult, Tool, CLEAR,
    MATERIAL,
};

use crate::contour::Polygon;
use crate::offset::peel;
use crate::program::ProgramSynthesizer;

/// Carving job parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarvingParameters {
    /// Physical width of the stock (mm), mapped to the image width.
    pub width_mm: f64,
    /// Physical length of the stock (mm), mapped to the image length.
    pub length_mm: f64,
    /// Physical height of the relief (mm), mapped to the 0..256 range.
    pub height_mm: f64,
    /// Nominal diameters of the mills to use (mm). Processed largest first
    /// regardless of the order given here.
    pub tool_diameters: Vec<f64>,
    /// Feed rate for cutting moves (mm/min). When unset, cut moves carry no
    /// feed tag and the machine's modal feed applies.
    pub feed_rate: Option<f64>,
    /// Maximum depth per roughing pass (mm). When unset, every cut plunges
    /// straight to its level depth in a single pass.
    pub step_down: Option<f64>,
}

impl Default for CarvingParameters {
    fn default() -> Self {
        Self {
            width_mm: 100.0,
            length_mm: 100.0,
            height_mm: 10.0,
            tool_diameters: Vec::new(),
            feed_rate: None,
            step_down: None,
        }
    }
}

impl CarvingParameters {
    /// Validate the parameter set before planning.
    pub fn validate(&self) -> ParameterResult<()> {
        for (name, value) in [
            ("width_mm", self.width_mm),
            ("length_mm", self.length_mm),
            ("height_mm", self.height_mm),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(ParameterError::InvalidDimensions(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.tool_diameters.is_empty() {
            return Err(ParameterError::Missing("tool_diameters".to_string()));
        }
        for &diameter in &self.tool_diameters {
            if diameter <= 0.0 || !diameter.is_finite() {
                return Err(ParameterError::InvalidValue {
                    name: "tool_diameters".to_string(),
                    reason: format!("diameter must be positive, got {diameter}"),
                });
            }
        }
        for (name, value) in [("feed_rate", self.feed_rate), ("step_down", self.step_down)] {
            if let Some(value) = value {
                if value <= 0.0 || !value.is_finite() {
                    return Err(ParameterError::InvalidValue {
                        name: name.to_string(),
                        reason: format!("must be positive, got {value}"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The contours gathered for one (level, tool) combination.
#[derive(Debug, Clone)]
pub struct ToolpathSegment {
    /// All ring polygons for the level, in ring order.
    pub polygons: Vec<Polygon>,
    /// The elevation level these contours cut down to.
    pub level: u8,
}

/// One tool's accumulated plan across all levels it touches.
///
/// Segments stay in accumulation order (level-descending, ring-ascending
/// within a level); that order already is the milling priority and is never
/// re-sorted.
#[derive(Debug, Clone)]
pub struct ToolPlan {
    /// The tool this plan belongs to.
    pub tool: Tool,
    /// Ordered contour segments.
    pub segments: Vec<ToolpathSegment>,
}

/// Relief carving planner for one heightmap.
pub struct ReliefCarver {
    matrix: ElevationMatrix,
    params: CarvingParameters,
    tools: Vec<Tool>,
    x_scale: f64,
    y_scale: f64,
}

impl ReliefCarver {
    /// Create a carver from a heightmap image file.
    pub fn from_file<P: AsRef<Path>>(path: P, params: CarvingParameters) -> CarveResult<Self> {
        let img = image::open(path.as_ref())?;
        Self::from_image(img, params)
    }

    /// Create a carver from an already-decoded image.
    pub fn from_image(img: DynamicImage, params: CarvingParameters) -> CarveResult<Self> {
        params.validate()?;
        let matrix = ElevationMatrix::from_image(&img);
        Self::from_matrix(matrix, params)
    }

    /// Create a carver from a prepared elevation matrix.
    pub fn from_matrix(matrix: ElevationMatrix, params: CarvingParameters) -> CarveResult<Self> {
        params.validate()?;
        let x_scale = matrix.width() as f64 / params.width_mm;
        let y_scale = matrix.length() as f64 / params.length_mm;

        let mut tools: Vec<Tool> = params
            .tool_diameters
            .iter()
            .map(|&d| Tool::from_diameter(d, x_scale, y_scale))
            .collect();
        Tool::sort_largest_first(&mut tools);

        Ok(Self {
            matrix,
            params,
            tools,
            x_scale,
            y_scale,
        })
    }

    /// Tools in processing order (largest first).
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Plan toolpath segments for every tool.
    pub fn plan(&self) -> Vec<ToolPlan> {
        self.plan_with_progress(|_| {})
    }

    /// Plan with a progress callback in 0.0..=1.0.
    pub fn plan_with_progress<F>(&self, mut progress: F) -> Vec<ToolPlan>
    where
        F: FnMut(f32),
    {
        let levels = self.matrix.levels();
        let mut plans: Vec<ToolPlan> = self
            .tools
            .iter()
            .map(|&tool| ToolPlan {
                tool,
                segments: Vec::new(),
            })
            .collect();

        let total = (levels.len() * self.tools.len()).max(1);
        let mut done = 0usize;
        progress(0.0);

        for &level in &levels {
            // The working mask is level-local: it starts from the elevation
            // matrix and accumulates tool state across the tool loop only.
            let mut working = BinaryMask::for_level(&self.matrix, level);
            debug!(level, material = working.count_of(MATERIAL), "level mask");

            for (index, tool) in self.tools.iter().enumerate() {
                let outcome = peel(&working, tool);
                if outcome.touched > 0 {
                    if let Some(first_ring) = &outcome.first_ring_mask {
                        merge_covered(&mut working, first_ring);
                    }
                    debug!(
                        level,
                        tool = tool.diameter,
                        rings = outcome.rings.len(),
                        uncovered = outcome.grown.count_of(MATERIAL),
                        "peeled"
                    );
                    plans[index].segments.push(ToolpathSegment {
                        polygons: outcome.polygons(),
                        level,
                    });
                } else {
                    debug!(level, tool = tool.diameter, "tool cannot touch this level");
                }
                done += 1;
                progress(done as f32 / total as f32);
            }
        }

        progress(1.0);
        plans
    }

    /// Generate one motion program per tool, in tool order.
    pub fn generate_programs(&self) -> Vec<(Tool, String)> {
        self.generate_programs_with_progress(|_| {})
    }

    /// Generate programs with a progress callback in 0.0..=1.0.
    pub fn generate_programs_with_progress<F>(&self, mut progress: F) -> Vec<(Tool, String)>
    where
        F: FnMut(f32),
    {
        let plans = self.plan_with_progress(|p| progress(p * 0.9));
        let programs = plans
            .into_iter()
            .map(|plan| {
                let synthesizer = ProgramSynthesizer::new(
                    self.matrix.width(),
                    self.matrix.length(),
                    self.x_scale,
                    self.y_scale,
                    self.params.height_mm,
                    self.params.feed_rate,
                    self.params.step_down,
                );
                (plan.tool, synthesizer.synthesize(&plan.segments))
            })
            .collect();
        progress(1.0);
        programs
    }

    /// Write one program file per tool into `dir`, named from the tool's
    /// nominal diameter. Returns the written paths in tool order.
    pub fn write_programs<P: AsRef<Path>>(&self, dir: P) -> CarveResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut written = Vec::new();
        for (tool, program) in self.generate_programs() {
            let path = dir.join(format!("path-M{}.ngc", tool.diameter));
            std::fs::write(&path, program)?;
            info!(path = %path.display(), tool = tool.diameter, "program written");
            written.push(path);
        }
        Ok(written)
    }
}

/// Clear from `working` the material the finished tool fully machined.
///
/// The first growth ring's mask is applied inverted: material lying beyond
/// the first ring was reachable in the open and is cleared; the near-wall
/// band survives for the following smaller tools to refine.
fn merge_covered(working: &mut BinaryMask, first_ring: &BinaryMask) {
    for y in 0..working.length() {
        for x in 0..working.width() {
            if first_ring.get(x, y) == MATERIAL && working.get(x, y) == MATERIAL {
                working.set(x, y, CLEAR);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(diameters: &[f64]) -> CarvingParameters {
        CarvingParameters {
            width_mm: 10.0,
            length_mm: 10.0,
            height_mm: 10.0,
            tool_diameters: diameters.to_vec(),
            feed_rate: None,
            step_down: None,
        }
    }

    #[test]
    fn validation_rejects_bad_dimensions() {
        let mut p = params(&[2.0]);
        p.height_mm = 0.0;
        assert!(matches!(
            p.validate(),
            Err(ParameterError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn validation_requires_tools() {
        let p = params(&[]);
        assert!(matches!(p.validate(), Err(ParameterError::Missing(_))));
    }

    #[test]
    fn validation_rejects_nonpositive_step() {
        let mut p = params(&[2.0]);
        p.step_down = Some(-1.0);
        assert!(matches!(
            p.validate(),
            Err(ParameterError::InvalidValue { .. })
        ));
    }

    #[test]
    fn tools_are_reordered_largest_first() {
        let matrix = ElevationMatrix::from_raw(10, 10, vec![255; 100]);
        let carver = ReliefCarver::from_matrix(matrix, params(&[3.0, 8.0, 1.0])).unwrap();
        let diameters: Vec<f64> = carver.tools().iter().map(|t| t.diameter).collect();
        assert_eq!(diameters, vec![8.0, 3.0, 1.0]);
    }

    #[test]
    fn blank_heightmap_plans_nothing() {
        let matrix = ElevationMatrix::from_raw(10, 10, vec![255; 100]);
        let carver = ReliefCarver::from_matrix(matrix, params(&[2.0])).unwrap();
        let plans = carver.plan();
        assert_eq!(plans.len(), 1);
        assert!(plans[0].segments.is_empty());
    }

    #[test]
    fn segments_accumulate_in_level_descending_order() {
        // Two pockets at different elevations; levels run shallow to deep.
        let mut data = vec![255u8; 16 * 16];
        for y in 2..8 {
            for x in 2..8 {
                data[y * 16 + x] = 100;
            }
        }
        for y in 9..14 {
            for x in 9..14 {
                data[y * 16 + x] = 0;
            }
        }
        let matrix = ElevationMatrix::from_raw(16, 16, data);
        let carver = ReliefCarver::from_matrix(matrix, params(&[1.0])).unwrap();
        let plans = carver.plan();

        let touched: Vec<u8> = plans[0].segments.iter().map(|s| s.level).collect();
        let mut sorted = touched.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(touched, sorted);
        assert!(touched.contains(&0));
    }

    #[test]
    fn merge_clears_interior_but_keeps_wall_band() {
        let mut working = BinaryMask::filled(6, 6, MATERIAL);
        let mut first_ring = BinaryMask::filled(6, 6, CLEAR);
        // Ring consumed everything except the 2x2 interior.
        for y in 2..4 {
            for x in 2..4 {
                first_ring.set(x, y, MATERIAL);
            }
        }
        merge_covered(&mut working, &first_ring);

        // Interior material (beyond the ring) was cleared from the canvas.
        assert_eq!(working.get(2, 2), CLEAR);
        assert_eq!(working.get(3, 3), CLEAR);
        // The band the ring covered stays material for smaller tools.
        assert_eq!(working.get(0, 0), MATERIAL);
        assert_eq!(working.get(5, 2), MATERIAL);
    }

    #[test]
    fn progress_runs_from_zero_to_one() {
        let matrix = ElevationMatrix::from_raw(8, 8, vec![0; 64]);
        let carver = ReliefCarver::from_matrix(matrix, params(&[2.0])).unwrap();
        let mut seen = Vec::new();
        carver.plan_with_progress(|p| seen.push(p));
        assert_eq!(seen.first(), Some(&0.0));
        assert_eq!(seen.last(), Some(&1.0));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }
}
