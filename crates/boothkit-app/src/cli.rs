//! Command-line arguments.

use boothkit_core::Orientation;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "boothkit", about = "Photo-booth template layout tool")]
pub struct Cli {
    /// Editor configuration file (JSON); defaults are used when absent.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a template from a built-in layout for 1 to 4 pictures.
    Preset {
        count: usize,
        #[arg(long, default_value = "landscape")]
        orientation: Orientation,
        #[arg(long, default_value = "Untitled")]
        name: String,
        #[arg(long, default_value = "")]
        event: String,
        /// Background image source (path or data URL).
        #[arg(long)]
        background: Option<String>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Spread a template's pictures evenly over the paper.
    Distribute {
        template: PathBuf,
        #[arg(long)]
        columns: Option<usize>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Move a picture to (x, y) and report how it snapped.
    #[command(allow_negative_numbers = true)]
    Snap {
        template: PathBuf,
        id: String,
        x: f64,
        y: f64,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        /// Write the updated template here.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Summarize a template's frame and optionally export it as PNG.
    Render {
        template: PathBuf,
        /// Directory relative image paths are resolved against.
        #[arg(long)]
        assets: Option<PathBuf>,
        #[arg(long)]
        png: Option<PathBuf>,
        /// Output pixels per paper unit.
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },
    /// Print the effective editor configuration.
    Config,
}
