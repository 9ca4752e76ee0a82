//! Ember CLI - headless renderer and config tooling for the Ember particle engine

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::path::PointerPath;
use commands::{blend_modes, init, render};
use ember_core::BlendMode;

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Pointer-reactive glowing particle renderer", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine headless along a scripted pointer path and save the last frame
    Render {
        /// Engine configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Output image path
        #[arg(short, long, default_value = "frame.png")]
        output: String,

        /// Surface width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Surface height in pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Number of frames to simulate
        #[arg(long, default_value = "120")]
        frames: u64,

        /// Random seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Pointer path driving the spawns
        #[arg(long, value_enum, default_value = "circle")]
        path: PointerPath,

        /// Render as a backend without pixel filter support
        #[arg(long)]
        no_filters: bool,

        /// Override the particle blend mode
        #[arg(long, value_parser = parse_blend_mode)]
        blend_mode: Option<BlendMode>,

        /// Override the particle cap
        #[arg(long)]
        max_particles: Option<usize>,
    },

    /// Write a default engine configuration
    Init {
        /// Config file to create
        #[arg(default_value = "ember.toml")]
        path: String,
    },

    /// List the supported blend modes
    BlendModes,
}

fn parse_blend_mode(s: &str) -> Result<BlendMode, String> {
    s.parse().map_err(|e: ember_core::EmberError| e.to_string())
}

/// Level selected by repeated `-v`; `None` leaves `RUST_LOG` (or `warn`) in charge
fn verbosity_level(verbose: u8) -> Option<log::LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(log::LevelFilter::Info),
        2 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}

fn logger_builder(verbose: u8) -> env_logger::Builder {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = verbosity_level(verbose) {
        builder.filter_level(level);
    }
    builder
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger_builder(cli.verbose).init();

    match cli.command {
        Commands::Render {
            config,
            output,
            width,
            height,
            frames,
            seed,
            path,
            no_filters,
            blend_mode,
            max_particles,
        } => render::run(render::RenderArgs {
            config,
            output,
            width,
            height,
            frames,
            seed,
            path,
            no_filters,
            blend_mode,
            max_particles,
        }),
        Commands::Init { path } => init::run(&path),
        Commands::BlendModes => blend_modes::run(),
    }
}
