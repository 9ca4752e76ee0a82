//! Frame driver: drains queued events, steps and renders once per refresh

use crate::clock::FrameClock;
use crate::event::EngineEvent;
use crate::event_bus::EventBus;
use crate::input::PointerInput;
use crate::scheduler::{IntervalScheduler, RefreshScheduler};
use ember_core::Canvas;
use ember_particles::{FrameReport, ParticleEngine};
use rand::rngs::StdRng;
use rand::Rng;

/// Owns an engine and runs its frame loop
pub struct FrameDriver<C: Canvas, R: Rng = StdRng, S: RefreshScheduler = IntervalScheduler> {
    engine: ParticleEngine<C, R>,
    scheduler: S,
    events: EventBus,
    pointer: PointerInput,
    clock: FrameClock,
    started: bool,
    last_report: Option<FrameReport>,
}

impl<C: Canvas, R: Rng, S: RefreshScheduler> FrameDriver<C, R, S> {
    pub fn new(engine: ParticleEngine<C, R>, scheduler: S) -> Self {
        Self {
            engine,
            scheduler,
            events: EventBus::new(),
            pointer: PointerInput::new(),
            clock: FrameClock::new(),
            started: false,
            last_report: None,
        }
    }

    /// One-time setup: measure the surface, then render the first frame
    pub fn start(&mut self) -> FrameReport {
        if !self.started {
            self.started = true;
            let (width, height) = (
                self.engine.compositor().width(),
                self.engine.compositor().height(),
            );
            log::info!("[runtime] Frame driver started at {}x{}", width, height);
            self.events.push(EngineEvent::Resize { width, height });
        }
        self.tick()
    }

    /// Queue an event for the next tick
    pub fn post(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    /// Pointer or touch moved; a burst spawns at the next tick
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.moved(x, y, &mut self.events);
    }

    pub fn resized(&mut self, width: u32, height: u32) {
        self.events.push(EngineEvent::Resize { width, height });
    }

    /// Run one frame: pending events in posting order, then step and render
    pub fn tick(&mut self) -> FrameReport {
        self.clock.tick();
        for event in self.events.drain() {
            match event {
                EngineEvent::SpawnBurst { x, y } => {
                    self.engine.spawn_burst(x, y);
                }
                EngineEvent::Resize { width, height } => self.engine.resize(width, height),
            }
        }
        let report = self.engine.frame();
        self.last_report = Some(report);
        report
    }

    /// Loop until `frames` have run, or forever when `None`.
    ///
    /// `input` is called before every frame with the frame index so the host
    /// can feed pointer and resize notifications.
    pub fn run<F>(&mut self, frames: Option<u64>, mut input: F) -> Option<FrameReport>
    where
        F: FnMut(u64, &mut Self),
    {
        let mut frame = 0;
        while frames.is_none_or(|limit| frame < limit) {
            self.scheduler.wait_for_next_frame();
            input(frame, self);
            if self.started {
                self.tick();
            } else {
                self.start();
            }
            frame += 1;
        }
        log::debug!(
            "[runtime] Ran {} frames, {:.1} fps, {} resizes coalesced",
            frame,
            self.clock.fps(),
            self.events.coalesced()
        );
        self.last_report
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn last_report(&self) -> Option<FrameReport> {
        self.last_report
    }

    pub fn engine(&self) -> &ParticleEngine<C, R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ParticleEngine<C, R> {
        &mut self.engine
    }

    pub fn pointer(&self) -> &PointerInput {
        &self.pointer
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn into_engine(self) -> ParticleEngine<C, R> {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ImmediateScheduler;
    use ember_core::EngineConfig;
    use ember_render::{star_sheet, RasterCanvas, TextureCache};
    use rand::SeedableRng;
    use std::sync::Arc;

    type TestDriver = FrameDriver<RasterCanvas, StdRng, ImmediateScheduler>;

    fn driver() -> TestDriver {
        let mut config = EngineConfig::default();
        config.blur.radius = 4.0;
        config.sprite.frame_width = 16.0;
        config.sprite.frame_height = 16.0;

        let mut cache = TextureCache::new();
        let texture = cache.insert_image("stars", &star_sheet(5, 16, 16)).unwrap();
        let cache = Arc::new(cache);
        let engine = ParticleEngine::with_rng(
            config,
            RasterCanvas::new(48, 32, cache.clone()).unwrap(),
            RasterCanvas::new(48, 32, cache).unwrap(),
            texture,
            StdRng::seed_from_u64(99),
        )
        .unwrap();
        FrameDriver::new(engine, ImmediateScheduler)
    }

    #[test]
    fn start_renders_first_frame_once() {
        let mut d = driver();
        assert!(!d.is_started());
        let report = d.start();
        assert!(d.is_started());
        assert_eq!(report.composite_passes, 2);
        assert_eq!(d.clock().frame_count, 1);
        d.start();
        assert_eq!(d.clock().frame_count, 2);
    }

    #[test]
    fn spawned_between_frames_are_updated_once_next_tick() {
        let mut d = driver();
        d.start();
        d.pointer_moved(24.0, 16.0);
        assert_eq!(d.pending_events(), 1);
        let report = d.tick();
        assert_eq!(d.pending_events(), 0);
        assert!(report.stats.active >= 2);
        assert!(d
            .engine()
            .population()
            .active()
            .all(|p| (p.alpha - 0.98).abs() < 1e-6));
    }

    #[test]
    fn resize_event_applies_before_render() {
        let mut d = driver();
        d.resized(64, 40);
        d.tick();
        assert_eq!(d.engine().compositor().width(), 64);
        assert_eq!(d.engine().compositor().visible().pixmap().height(), 40);
        assert_eq!(d.engine().compositor().buffer().pixmap().width(), 64);
    }

    #[test]
    fn resize_storm_reallocates_once_per_tick() {
        let mut d = driver();
        d.start();
        d.resized(50, 30);
        d.resized(60, 30);
        d.pointer_moved(5.0, 5.0);
        d.resized(70, 30);
        d.resized(80, 36);
        assert_eq!(d.pending_events(), 3);
        d.tick();
        assert_eq!(d.engine().compositor().width(), 80);
        assert_eq!(d.engine().compositor().visible().pixmap().height(), 36);
    }

    #[test]
    fn run_feeds_input_each_frame() {
        let mut d = driver();
        let mut calls = 0;
        let last = d.run(Some(12), |frame, driver| {
            calls += 1;
            driver.pointer_moved(frame as f32 * 3.0, 16.0);
        });
        assert_eq!(calls, 12);
        assert_eq!(d.clock().frame_count, 12);
        assert_eq!(d.pointer().move_count(), 12);
        assert_eq!(d.pointer().position, (33.0, 16.0));
        let last = last.unwrap();
        assert!(last.stats.active > 0);
        assert_eq!(last, d.last_report().unwrap());
    }

    #[test]
    fn run_zero_frames_does_nothing() {
        let mut d = driver();
        assert!(d.run(Some(0), |_, _| {}).is_none());
        assert!(!d.is_started());
    }

    #[test]
    fn glow_lights_up_the_visible_surface() {
        let mut d = driver();
        d.run(Some(6), |_, driver| driver.pointer_moved(24.0, 16.0));
        let pixmap = d.engine().compositor().visible().pixmap();
        let [r, g, b, _] = d.engine().config().background_color.to_rgba8();
        let background = r as u32 + g as u32 + b as u32;
        let brighter = pixmap
            .pixels()
            .iter()
            .any(|p| p.red() as u32 + p.green() as u32 + p.blue() as u32 > background + 12);
        assert!(brighter);
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 255));
    }
}
