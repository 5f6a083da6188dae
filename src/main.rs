use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use log::info;

use violin_swarm::{render, CohortGenerator, GlyphPolicy, PlotSettings, RenderRequest};

#[derive(Parser)]
#[command(author, version, about = "Violin + swarm charts with recoverable point identity", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a request file (.json, .toml, .yaml)
    Render {
        /// Render request: series, optional colors and settings
        #[arg(long)]
        input: PathBuf,
        /// Plot settings file replacing the request's settings
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the static SVG here
        #[arg(long)]
        svg: Option<PathBuf>,
        /// Write the point list as JSON here
        #[arg(long)]
        points: Option<PathBuf>,
        /// Tag point glyphs instead of removing them
        #[arg(long)]
        annotate: bool,
    },
    /// Print a synthetic render request as JSON
    Synthetic {
        #[arg(long, default_value_t = 100)]
        students: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _logger = Logger::try_with_env_or_str(&cli.log_level)?
        .log_to_stderr()
        .start()?;

    match cli.command {
        Command::Render {
            input,
            config,
            svg,
            points,
            annotate,
        } => {
            let mut request = RenderRequest::from_path(&input)?;
            if let Some(path) = config {
                request.settings = PlotSettings::from_path(path)?;
            }
            if annotate {
                request.settings.glyphs = GlyphPolicy::Annotate;
            }

            let output = render(&request)?;
            for (phase, ms) in output.timings.entries() {
                info!("{}: {} ms", phase, ms);
            }

            let wrote_file = svg.is_some() || points.is_some();
            if let Some(path) = svg {
                fs::write(&path, &output.svg)?;
                info!("wrote {}", path.display());
            }
            if let Some(path) = points {
                fs::write(&path, serde_json::to_string_pretty(&output.points)?)?;
                info!("wrote {}", path.display());
            }
            if !wrote_file {
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        Command::Synthetic { students, seed } => {
            let request = CohortGenerator::new(seed).request(students)?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}
