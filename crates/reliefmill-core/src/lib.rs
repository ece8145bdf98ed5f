//! # Reliefmill Core
//!
//! Core types for the reliefmill toolpath planner: elevation matrices
//! normalized from heightmap images, binary machining masks, milling tools,
//! and the shared error types.

pub mod error;
pub mod heightmap;
pub mod mask;
pub mod tool;

pub use error::{CarveError, CarveResult, ParameterError, ParameterResult};
pub use heightmap::{ElevationMatrix, BACKGROUND};
pub use mask::{BinaryMask, CLEAR, MATERIAL};
pub use tool::Tool;
