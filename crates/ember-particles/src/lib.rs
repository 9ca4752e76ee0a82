//! Ember Particles - pointer-reactive sprite particle simulation
//!
//! Provides the simulation core and its compositing:
//! - `Particle` kinematics with drag, wander steering and alpha/scale decay
//! - `Population` with FIFO eviction and an order-preserving dead-particle pool
//! - `Compositor` drawing into an off-screen buffer, then a blurred underlay
//!   and a contrast-boosted overlay onto the visible surface
//! - `ParticleEngine` owning all of the above plus an injected random source

pub mod compositor;
pub mod engine;
pub mod particle;
pub mod population;
pub mod random;
pub mod stats;

#[cfg(test)]
mod testing;

pub use compositor::Compositor;
pub use engine::{FrameReport, ParticleEngine};
pub use particle::Particle;
pub use population::{Population, PopulationStats};
pub use stats::{LogStatsSink, NullStatsSink, StatsSink};
