//! # Labelstrip CLI
//!
//! Command-line interface for rendering label strips.
//!
//! ## Usage
//!
//! ```bash
//! # Render a label to a PNG preview
//! labelstrip render label.json --png label.png
//!
//! # Render printer raster transfer bytes with an extra font
//! labelstrip render label.json --raster label.bin --font inter=Inter.ttf
//!
//! # List font families
//! labelstrip fonts --font inter:700=Inter-Bold.ttf
//!
//! # Start the HTTP preview service
//! labelstrip serve --listen 0.0.0.0:8080
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `labelstrip=info`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use labelstrip::{
    LabelError,
    decode::DefaultLoader,
    fonts::{FontRegistry, FontSource},
    label::{InkColor, LabelDocument},
    pipeline::LabelSession,
    render::RenderOptions,
    server::{AppState, DEFAULT_LISTEN_ADDR, ServerConfig},
};

/// Labelstrip - label tape strip renderer
#[derive(Parser, Debug)]
#[command(name = "labelstrip")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a label document
    Render {
        /// Label document (JSON)
        label: PathBuf,

        /// Write a PNG preview
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Write printer raster transfer bytes
        #[arg(long, value_name = "FILE")]
        raster: Option<PathBuf>,

        /// Load a font file (FAMILY=PATH or FAMILY:VARIANT=PATH)
        #[arg(long = "font", value_name = "FAMILY=PATH")]
        fonts: Vec<FontSource>,

        /// Ink color, overriding the document's
        #[arg(long, value_name = "R,G,B", value_parser = parse_color)]
        color: Option<InkColor>,

        /// Draw text guide lines into the preview
        #[arg(long)]
        debug_lines: bool,
    },

    /// List available font families
    Fonts {
        /// Load a font file (FAMILY=PATH or FAMILY:VARIANT=PATH)
        #[arg(long = "font", value_name = "FAMILY=PATH")]
        fonts: Vec<FontSource>,
    },

    /// Start the HTTP preview service
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
        listen: String,

        /// Load a font file (FAMILY=PATH or FAMILY:VARIANT=PATH)
        #[arg(long = "font", value_name = "FAMILY=PATH")]
        fonts: Vec<FontSource>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("labelstrip=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            label,
            png,
            raster,
            fonts,
            color,
            debug_lines,
        } => {
            let json = tokio::fs::read_to_string(&label).await?;
            let (label, doc_ink) = LabelDocument::from_json(&json)?.into_label()?;

            let mut registry = FontRegistry::with_builtin();
            registry.load_sources(&fonts)?;

            let options = RenderOptions {
                ink: color.unwrap_or(doc_ink),
                debug_lines,
                ..Default::default()
            };
            let mut session = LabelSession::new(Arc::new(DefaultLoader::new()?), options);
            let buffer = session.render(&label, &registry).await?;

            for notice in &buffer.notices {
                println!("notice: {}", notice);
            }

            if let Some(path) = png {
                tokio::fs::write(&path, buffer.to_png()?).await?;
                println!("Saved preview to {}", path.display());
            }
            if let Some(path) = raster {
                tokio::fs::write(&path, buffer.to_raster(&options.tape)?).await?;
                println!("Saved raster to {}", path.display());
            }

            println!(
                "Rendered {}x{} strip ({:.1} mm)",
                buffer.width(),
                buffer.height(),
                options.tape.strip_length_mm(buffer.width())
            );
        }

        Commands::Fonts { fonts } => {
            let mut registry = FontRegistry::with_builtin();
            registry.load_sources(&fonts)?;
            for family in registry.families() {
                println!("{}", family);
            }
        }

        Commands::Serve { listen, fonts } => {
            let mut registry = FontRegistry::with_builtin();
            registry.load_sources(&fonts)?;

            let config = ServerConfig {
                listen_addr: listen,
                ..Default::default()
            };
            let state = AppState::new(config, registry, Arc::new(DefaultLoader::new()?));
            labelstrip::server::serve(state).await?;
        }
    }

    Ok(())
}

/// Parse `R,G,B` with each channel in 0..=255.
fn parse_color(s: &str) -> Result<InkColor, String> {
    let channels = s
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid color '{}': {}", s, e))?;
    match channels.as_slice() {
        &[r, g, b] => Ok(InkColor::new(r, g, b)),
        _ => Err(format!("expected R,G,B, got '{}'", s)),
    }
}
