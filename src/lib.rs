//! # Reliefmill
//!
//! Converts a grayscale heightmap image into per-tool CNC milling programs
//! that carve a 3D relief from a flat block, largest mill first.
//!
//! ## Architecture
//!
//! Reliefmill is organized as a workspace:
//!
//! 1. **reliefmill-core** - elevation matrices, binary masks, tools, errors
//! 2. **reliefmill-carve** - the planning engine: onion-peel offsetting,
//!    contour accumulation, G-code synthesis
//! 3. **reliefmill** - the command-line binary that ties them together

pub use reliefmill_carve::{
    extract_contours, peel, CarvingParameters, OffsetOutcome, OffsetRing, Polygon,
    ProgramSynthesizer, ReliefCarver, ToolPlan, ToolpathSegment,
};
pub use reliefmill_core::{
    BinaryMask, CarveError, CarveResult, ElevationMatrix, ParameterError, Tool, BACKGROUND, CLEAR,
    MATERIAL,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stdout
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
