//! Bounded particle population: ordered active list plus a free-list pool

use crate::particle::Particle;
use crate::random::sample;
use ember_core::{EvictionPolicy, FrameRect, TextureId};
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;

/// Counts reported to the stats sink after each frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopulationStats {
    pub active: usize,
    pub pooled: usize,
}

impl fmt::Display for PopulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Active = {}\nCached = {}", self.active, self.pooled)
    }
}

/// Active particles in spawn order (oldest first) and a pool of dead ones.
///
/// Every allocated particle lives in exactly one of the two lists, except
/// particles dropped by `EvictionPolicy::Discard`, which are counted in `discarded`.
pub struct Population {
    active: VecDeque<Particle>,
    free: Vec<Particle>,
    texture: TextureId,
    frames: Vec<FrameRect>,
    allocated: usize,
    evicted: usize,
    discarded: usize,
}

impl Population {
    pub fn new(texture: TextureId, frames: Vec<FrameRect>) -> Self {
        Self {
            active: VecDeque::new(),
            free: Vec::new(),
            texture,
            frames,
            allocated: 0,
            evicted: 0,
            discarded: 0,
        }
    }

    /// Sprite source used for particles allocated from now on
    pub fn set_sprite(&mut self, texture: TextureId, frames: Vec<FrameRect>) {
        self.texture = texture;
        self.frames = frames;
    }

    /// Obtain a particle, initialize it at `(x, y)` and append it as the newest.
    ///
    /// When `max_particles` are already active the oldest is evicted first.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        x: f32,
        y: f32,
        max_particles: usize,
        policy: EvictionPolicy,
        rng: &mut R,
    ) {
        let mut particle = None;
        if self.active.len() >= max_particles {
            if let Some(oldest) = self.active.pop_front() {
                self.evicted += 1;
                match policy {
                    EvictionPolicy::Reuse => particle = Some(oldest),
                    EvictionPolicy::Discard => self.discarded += 1,
                }
            }
        }
        let mut particle = match particle {
            Some(p) => p,
            None => match self.free.pop() {
                Some(p) => p,
                None => self.allocate(rng),
            },
        };
        particle.init(x, y, rng);
        self.active.push_back(particle);
    }

    fn allocate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Particle {
        let frame = sample(rng, &self.frames).copied().unwrap_or_default();
        self.allocated += 1;
        if self.allocated.is_power_of_two() && self.allocated >= 256 {
            log::debug!("[particles] Pool grew to {} particles", self.allocated);
        }
        Particle::new(self.texture, frame)
    }

    /// Update every active particle once; move the dead to the pool, keeping survivor order
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let len = self.active.len();
        let mut kept = 0;
        for i in 0..len {
            if self.active[i].update(rng) {
                self.active.swap(kept, i);
                kept += 1;
            }
        }
        self.free.extend(self.active.drain(kept..));
    }

    /// Recycle the oldest active particles until at most `max_particles` remain
    pub fn shrink_to(&mut self, max_particles: usize) {
        while self.active.len() > max_particles {
            if let Some(mut p) = self.active.pop_front() {
                p.alive = false;
                self.free.push(p);
            }
        }
    }

    /// Recycle every active particle
    pub fn clear(&mut self) {
        self.shrink_to(0);
    }

    pub fn active(&self) -> impl ExactSizeIterator<Item = &Particle> + DoubleEndedIterator {
        self.active.iter()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn pooled_count(&self) -> usize {
        self.free.len()
    }

    /// Particles ever created
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Eviction events under capacity pressure
    pub fn evicted(&self) -> usize {
        self.evicted
    }

    /// Evicted particles that were dropped rather than reused
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn stats(&self) -> PopulationStats {
        PopulationStats {
            active: self.active.len(),
            pooled: self.free.len(),
        }
    }
}
