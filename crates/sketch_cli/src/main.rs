//! Sketch CLI
//!
//! Inspect cubic-bezier timing curves and run sketch configurations headless.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod curve;
mod run;

#[derive(Parser)]
#[command(name = "sketch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sketch animation runtime CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample, invert, or split a timing curve
    Curve {
        /// Named curve (linear, ease, ease-in, ease-out, ease-in-out)
        #[arg(short, long, conflicts_with = "points")]
        preset: Option<String>,

        /// Control points p1x,p1y,p2x,p2y
        #[arg(long, value_delimiter = ',', num_args = 4)]
        points: Option<Vec<f64>>,

        /// Print this many evenly spaced samples
        #[arg(short, long)]
        samples: Option<u32>,

        /// Find t for an x coordinate
        #[arg(long)]
        solve_x: Option<f64>,

        /// Find t for a y coordinate
        #[arg(long)]
        solve_y: Option<f64>,

        /// Split the curve at parameter t
        #[arg(long)]
        divide_t: Option<f64>,

        /// Solver tolerance
        #[arg(short, long, default_value = "1e-6")]
        epsilon: f64,
    },

    /// Run a sketch configuration on the headless host
    Run {
        /// sketch.toml with context options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of frames to pump
        #[arg(short, long, default_value = "60")]
        frames: u32,

        /// Milliseconds between frames
        #[arg(long, default_value = "16")]
        tick_ms: f64,

        /// Viewport width
        #[arg(long, default_value = "1280")]
        width: f32,

        /// Viewport height
        #[arg(long, default_value = "720")]
        height: f32,

        /// Device pixel ratio reported by the viewport
        #[arg(long)]
        dpr: Option<f32>,

        /// Use the timer emulation instead of native frames
        #[arg(long)]
        timer: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Curve {
            preset,
            points,
            samples,
            solve_x,
            solve_y,
            divide_t,
            epsilon,
        } => curve::cmd_curve(curve::CurveArgs {
            preset,
            points,
            samples,
            solve_x,
            solve_y,
            divide_t,
            epsilon,
        }),

        Commands::Run {
            config,
            frames,
            tick_ms,
            width,
            height,
            dpr,
            timer,
        } => run::cmd_run(run::RunArgs {
            config,
            frames,
            tick_ms,
            width,
            height,
            dpr,
            timer,
        }),
    }
}
