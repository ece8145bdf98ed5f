//! Onion-peel offset engine.
//!
//! Given a removal mask and a tool, the engine repeatedly detects the
//! boundary of the remaining material and stamps the tool footprint over it,
//! growing the clear region one ring at a time. The contour of the grown
//! canvas after ring k is the tool-center path for pass k, one tool radius
//! further from the original walls than the previous ring. Material pockets
//! narrower than the footprint are swallowed by stamps from their rim and
//! never receive an interior contour: the tool cannot physically enter them
//! and they are left uncut.
//!
//! Growth is monotonic: within a pass a pixel only ever transitions from
//! material to clear, and a stamp either fully applies or not at all.

use reliefmill_core::{BinaryMask, Tool, CLEAR, MATERIAL};

use crate::contour::{extract_contours, Polygon};

/// One growth step of the onion-peel process.
#[derive(Debug, Clone)]
pub struct OffsetRing {
    /// Boundary polygons of the grown canvas after this ring.
    pub polygons: Vec<Polygon>,
    /// Pixels newly cleared by this ring's stamps.
    pub newly_cleared: usize,
    /// Still-exposed boundary pixels of the grown color after this ring.
    pub exposed: usize,
}

/// The full result of peeling one mask with one tool.
#[derive(Debug, Clone)]
pub struct OffsetOutcome {
    /// Growth rings in increasing-depth order (ring 0 is outermost).
    pub rings: Vec<OffsetRing>,
    /// Canvas state after the first ring, captured for the mask merger.
    pub first_ring_mask: Option<BinaryMask>,
    /// Fully grown canvas at termination.
    pub grown: BinaryMask,
    /// Accumulated exposed-boundary count across rings. Zero means the tool
    /// could not touch this mask at all.
    pub touched: usize,
}

impl OffsetOutcome {
    /// All ring polygons in ring order, flattened.
    pub fn polygons(&self) -> Vec<Polygon> {
        self.rings
            .iter()
            .flat_map(|ring| ring.polygons.iter().cloned())
            .collect()
    }
}

/// Peel the reachable area of `mask` for `tool`.
///
/// Terminates when a full pass detects no material boundary, which happens
/// once every material pixel has been consumed; the pass count is bounded by
/// the mask diagonal over the smaller tool radius.
pub fn peel(mask: &BinaryMask, tool: &Tool) -> OffsetOutcome {
    let width = mask.width();
    let length = mask.length();

    let mut canvas = mask.clone();
    let mut rings = Vec::new();
    let mut first_ring_mask = None;
    let mut touched = 0;

    loop {
        let mut cache = canvas.clone();
        let mut grew = false;
        for y in 0..length {
            for x in 0..width {
                if canvas.is_boundary(x, y, MATERIAL) {
                    cache.fill_ellipse(x as f64, y as f64, tool.x_radius, tool.y_radius, CLEAR);
                    grew = true;
                }
            }
        }
        if !grew {
            break;
        }

        if first_ring_mask.is_none() {
            first_ring_mask = Some(cache.clone());
        }

        let newly_cleared = canvas.count_of(MATERIAL) - cache.count_of(MATERIAL);
        let polygons = extract_contours(&cache);
        let exposed = cache.boundary_count(CLEAR);
        touched += exposed;
        rings.push(OffsetRing {
            polygons,
            newly_cleared,
            exposed,
        });

        canvas = cache;
    }

    OffsetOutcome {
        rings,
        first_ring_mask,
        grown: canvas,
        touched,
    }
}
