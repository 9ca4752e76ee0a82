//! Ember Runtime - frame loop infrastructure
//!
//! Provides the pieces that drive a `ParticleEngine` once per refresh:
//! - `FrameClock` - per-frame delta, total time and smoothed FPS
//! - `EngineEvent` / `EventBus` - queue of input and resize events drained each tick
//! - `PointerInput` - pointer position tracking that posts spawn bursts
//! - `RefreshScheduler` - pacing between frames
//! - `FrameDriver` - start, tick and run loop

mod clock;
mod driver;
mod event;
mod event_bus;
mod input;
mod scheduler;

pub use clock::FrameClock;
pub use driver::FrameDriver;
pub use event::EngineEvent;
pub use event_bus::EventBus;
pub use input::{PointerInput, OFFSCREEN};
pub use scheduler::{ImmediateScheduler, IntervalScheduler, RefreshScheduler};
