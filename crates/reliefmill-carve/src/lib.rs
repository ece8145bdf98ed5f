//! # Reliefmill Carve
//!
//! The toolpath planning engine for relief milling. Converts a normalized
//! heightmap into per-tool motion programs:
//!
//! - **Contour extraction**: closed boundary polygons from binary masks,
//!   largest area first.
//! - **Offset engine**: iterative onion-peel growth of the machined region
//!   by the tool footprint, one contour ring per pass.
//! - **Carver**: the level x tool driver with contour accumulation and
//!   working-mask merging between tools.
//! - **Program synthesis**: G-code emission with depth stepping, feed
//!   tagging, and border suppression.

pub mod carver;
pub mod contour;
pub mod offset;
pub mod program;

pub use carver::{CarvingParameters, ReliefCarver, ToolPlan, ToolpathSegment};
pub use contour::{extract_contours, Polygon};
pub use offset::{peel, OffsetOutcome, OffsetRing};
pub use program::ProgramSynthesizer;
