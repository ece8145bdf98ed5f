use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use reliefmill::{init_logging, CarvingParameters, ReliefCarver};

#[derive(Parser)]
#[command(
    name = "reliefmill",
    version,
    about = "Heightmap image to multi-tool CNC relief milling G-code"
)]
struct Cli {
    /// Heightmap image path (intensity encodes elevation, 255 = untouched stock)
    #[arg(short = 'f', long)]
    image: PathBuf,

    /// Mill diameter in mm; repeat for multiple tools (processed largest first)
    #[arg(short, long = "mill")]
    mill: Vec<f64>,

    /// Physical stock width in mm
    #[arg(short, long)]
    width: Option<f64>,

    /// Physical stock length in mm
    #[arg(short, long)]
    length: Option<f64>,

    /// Physical relief height in mm
    #[arg(short = 'z', long)]
    height: Option<f64>,

    /// Feed rate for cutting moves in mm/min
    #[arg(long)]
    feed: Option<f64>,

    /// Maximum depth per roughing pass in mm (straight plunge when omitted)
    #[arg(short, long)]
    step: Option<f64>,

    /// JSON file with carving parameters; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the generated .ngc programs
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

impl Cli {
    /// Fold the optional config file and the command line into one
    /// parameter set. Flags win over the file; the file wins over defaults.
    fn parameters(&self) -> anyhow::Result<CarvingParameters> {
        let mut params = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => CarvingParameters::default(),
        };

        if let Some(width) = self.width {
            params.width_mm = width;
        }
        if let Some(length) = self.length {
            params.length_mm = length;
        }
        if let Some(height) = self.height {
            params.height_mm = height;
        }
        if !self.mill.is_empty() {
            params.tool_diameters = self.mill.clone();
        }
        if self.feed.is_some() {
            params.feed_rate = self.feed;
        }
        if self.step.is_some() {
            params.step_down = self.step;
        }
        Ok(params)
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let params = cli.parameters()?;

    info!(
        image = %cli.image.display(),
        tools = ?params.tool_diameters,
        "planning relief toolpaths"
    );

    let carver = ReliefCarver::from_file(&cli.image, params)
        .with_context(|| format!("failed to load heightmap {}", cli.image.display()))?;

    let written = carver
        .write_programs(&cli.output_dir)
        .with_context(|| format!("failed to write programs to {}", cli.output_dir.display()))?;

    for path in &written {
        println!("{}", path.display());
    }
    info!(programs = written.len(), "done");
    Ok(())
}
