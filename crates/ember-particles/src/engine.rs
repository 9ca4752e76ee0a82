//! Engine instance: owns the population, compositor, configuration and RNG

use crate::compositor::Compositor;
use crate::population::{Population, PopulationStats};
use crate::random::burst_count;
use crate::stats::{NullStatsSink, StatsSink};
use ember_core::{Canvas, EngineConfig, Result, TextureId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Outcome of one `render`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Times the off-screen buffer was drawn onto the visible surface
    pub composite_passes: usize,
    pub stats: PopulationStats,
}

/// Pointer-reactive particle engine over two surfaces of the same backend
pub struct ParticleEngine<C: Canvas, R: Rng = StdRng> {
    config: EngineConfig,
    population: Population,
    compositor: Compositor<C>,
    texture: TextureId,
    rng: R,
    stats_sink: Box<dyn StatsSink>,
}

impl<C: Canvas> ParticleEngine<C, StdRng> {
    /// Engine with an OS-seeded generator
    pub fn new(config: EngineConfig, visible: C, buffer: C, texture: TextureId) -> Result<Self> {
        Self::with_rng(config, visible, buffer, texture, StdRng::from_os_rng())
    }
}

impl<C: Canvas, R: Rng> ParticleEngine<C, R> {
    /// Engine with an injected generator; rejects invalid configuration
    pub fn with_rng(
        config: EngineConfig,
        visible: C,
        mut buffer: C,
        texture: TextureId,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        if (buffer.width(), buffer.height()) != (visible.width(), visible.height()) {
            buffer.resize(visible.width(), visible.height());
        }
        let compositor = Compositor::new(visible, buffer);
        log::info!(
            "[particles] Engine ready: {}x{}, max {} particles, blend {}, blur {}, contrast {}",
            compositor.width(),
            compositor.height(),
            config.max_particles,
            config.blend_mode,
            config.blur.enabled,
            config.contrast.enabled,
        );
        Ok(Self {
            population: Population::new(texture, config.frames()),
            config,
            compositor,
            texture,
            rng,
            stats_sink: Box::new(NullStatsSink),
        })
    }

    /// Spawn one particle at `(x, y)`, evicting the oldest when at capacity
    pub fn spawn(&mut self, x: f32, y: f32) {
        self.population.spawn(
            x,
            y,
            self.config.max_particles,
            self.config.eviction,
            &mut self.rng,
        );
    }

    /// Spawn a random burst of 2 to 6 particles at `(x, y)`; returns how many
    pub fn spawn_burst(&mut self, x: f32, y: f32) -> usize {
        let count = burst_count(&mut self.rng);
        for _ in 0..count {
            self.spawn(x, y);
        }
        count
    }

    /// Advance every active particle one tick and recycle the dead
    pub fn step(&mut self) {
        // A lowered cap through config_mut applies here
        self.population.shrink_to(self.config.max_particles);
        self.population.step(&mut self.rng);
    }

    /// Composite the current population and report stats to the sink
    pub fn render(&mut self) -> FrameReport {
        let composite_passes = self
            .compositor
            .render(self.population.active(), &self.config);
        let stats = self.population.stats();
        self.stats_sink.report(&stats);
        FrameReport {
            composite_passes,
            stats,
        }
    }

    /// `step` followed by `render`
    pub fn frame(&mut self) -> FrameReport {
        self.step();
        self.render()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("[particles] Resize to {}x{}", width, height);
        self.compositor.resize(width, height);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Direct field access. Sprite changes only take effect through `set_config`.
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Replace the whole configuration after validating it
    pub fn set_config(&mut self, config: EngineConfig) -> Result<()> {
        config.validate()?;
        if config.sprite != self.config.sprite {
            self.population.set_sprite(self.texture, config.frames());
        }
        self.population.shrink_to(config.max_particles);
        self.config = config;
        Ok(())
    }

    /// Texture bound to particles allocated from now on
    pub fn set_texture(&mut self, texture: TextureId) {
        self.texture = texture;
        self.population.set_sprite(texture, self.config.frames());
    }

    pub fn set_stats_sink(&mut self, sink: impl StatsSink + 'static) {
        self.stats_sink = Box::new(sink);
    }

    /// Recycle every active particle
    pub fn clear(&mut self) {
        self.population.clear();
    }

    pub fn stats(&self) -> PopulationStats {
        self.population.stats()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn compositor(&self) -> &Compositor<C> {
        &self.compositor
    }

    pub fn supports_filters(&self) -> bool {
        self.compositor.supports_filters()
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
