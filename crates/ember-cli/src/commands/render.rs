//! Headless particle render to PNG

use crate::commands::path::PointerPath;
use anyhow::{Context, Result};
use ember_core::{BlendMode, EngineConfig};
use ember_particles::{LogStatsSink, ParticleEngine};
use ember_render::{star_atlas, RasterCanvas, TextureCache};
use ember_runtime::{FrameDriver, ImmediateScheduler};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::sync::Arc;

pub struct RenderArgs {
    pub config: Option<String>,
    pub output: String,
    pub width: u32,
    pub height: u32,
    pub frames: u64,
    pub seed: Option<u64>,
    pub path: PointerPath,
    pub no_filters: bool,
    pub blend_mode: Option<BlendMode>,
    pub max_particles: Option<usize>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        anyhow::bail!("Surface size must be non-zero, got {}x{}", args.width, args.height);
    }

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .inspect_err(|e| log::warn!("[config] {}", e))
            .with_context(|| format!("Failed to load config '{}'", path))?,
        None => EngineConfig::default(),
    };
    if let Some(mode) = args.blend_mode {
        config.blend_mode = mode;
    }
    if let Some(max) = args.max_particles {
        config.max_particles = max;
    }

    // Sprite sheet: configured image or generated stars
    let mut cache = TextureCache::new();
    let texture = match &config.sprite.texture {
        Some(path) => cache
            .load_file("sprite", path)
            .context("Failed to load sprite texture")?,
        None => cache
            .insert_image("stars", &star_atlas(&config.frames()))
            .context("Failed to generate star sprites")?,
    };
    let cache = Arc::new(cache);

    let surface = if args.no_filters {
        RasterCanvas::without_filters
    } else {
        RasterCanvas::new
    };
    let visible = surface(args.width, args.height, cache.clone())
        .context("Failed to create visible surface")?;
    let buffer =
        surface(args.width, args.height, cache).context("Failed to create buffer surface")?;

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut engine = ParticleEngine::with_rng(config, visible, buffer, texture, rng)
        .inspect_err(|e| log::warn!("[config] {}", e))
        .context("Invalid engine configuration")?;
    engine.set_stats_sink(LogStatsSink::new(30));

    println!(
        "Rendering {} frames at {}x{} (blend {}, filters {})",
        args.frames,
        args.width,
        args.height,
        engine.config().blend_mode,
        if engine.supports_filters() { "on" } else { "off" }
    );

    let mut driver = FrameDriver::new(engine, ImmediateScheduler);
    let (path, total, width, height) = (args.path, args.frames, args.width, args.height);
    let report = driver.run(Some(total), |frame, driver| {
        let (x, y) = path.position(frame, total, width, height);
        driver.pointer_moved(x, y);
    });

    let output = Path::new(&args.output);
    driver
        .engine()
        .compositor()
        .visible()
        .save_png(output)
        .context("Failed to save frame")?;

    println!("Saved {}", output.display());
    if let Some(report) = report {
        println!("{}", report.stats);
        println!("Composite passes: {}", report.composite_passes);
    }
    let population = driver.engine().population();
    println!(
        "Allocated: {} (evicted {}, discarded {})",
        population.allocated(),
        population.evicted(),
        population.discarded()
    );
    Ok(())
}
