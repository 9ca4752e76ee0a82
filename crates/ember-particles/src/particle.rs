//! A single sprite particle: kinematics, decay and draw transform

use crate::random::range;
use ember_core::{Affine2, Canvas, FrameRect, TextureId};
use rand::Rng;
use std::f32::consts::TAU;

/// Per-tick multiplier applied to alpha
pub const ALPHA_DECAY: f32 = 0.98;
/// Per-tick multiplier applied to scale
pub const SCALE_DECAY: f32 = 0.985;
/// A particle dies once scale or alpha falls to or below this
pub const DEATH_THRESHOLD: f32 = 0.06;
/// Strength of the per-tick steering push along the heading
pub const STEERING_FORCE: f32 = 0.1;

/// Liveness rule: both scale and alpha strictly above the threshold
pub fn survives(scale: f32, alpha: f32) -> bool {
    scale > DEATH_THRESHOLD && alpha > DEATH_THRESHOLD
}

/// Sprite particle. Instances are reused: `init` overwrites every per-life field.
#[derive(Clone, Debug)]
pub struct Particle {
    pub texture: TextureId,
    pub frame: FrameRect,
    pub origin: [f32; 2],

    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Velocity multiplier per tick, fixed for the particle's life
    pub drag: f32,
    /// Heading angle that steers the drift
    pub theta: f32,
    /// Heading jitter magnitude, fixed for the particle's life
    pub wander: f32,
    pub rotation: f32,
    pub scale: f32,
    pub alpha: f32,
    pub alive: bool,
    pub matrix: Affine2,
}

impl Particle {
    pub fn new(texture: TextureId, frame: FrameRect) -> Self {
        Self {
            texture,
            frame,
            origin: frame.origin(),
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            drag: 0.0,
            theta: 0.0,
            wander: 0.0,
            rotation: 0.0,
            scale: 0.0,
            alpha: 0.0,
            alive: false,
            matrix: Affine2::IDENTITY,
        }
    }

    /// Start a new life at `(x, y)` with a random heading, speed, drag, scale and wander
    pub fn init<R: Rng + ?Sized>(&mut self, x: f32, y: f32, rng: &mut R) {
        let angle = range(rng, 0.0, TAU);
        let force = range(rng, 2.0, 6.0);
        self.x = x;
        self.y = y;
        self.alpha = 1.0;
        self.alive = true;
        self.theta = angle;
        self.vx = angle.sin() * force;
        self.vy = angle.cos() * force;
        self.rotation = self.vy.atan2(self.vx);
        self.drag = range(rng, 0.82, 0.97);
        self.scale = range(rng, 0.1, 1.0);
        self.wander = range(rng, 0.5, 1.0);
        self.matrix = Affine2::IDENTITY;
    }

    /// Advance one tick; returns the new alive state
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vx *= self.drag;
        self.vy *= self.drag;
        self.theta += range(rng, -0.5, 0.5) * self.wander;
        self.vx += self.theta.sin() * STEERING_FORCE;
        self.vy += self.theta.cos() * STEERING_FORCE;
        self.rotation = self.vy.atan2(self.vx);
        self.alpha *= ALPHA_DECAY;
        self.scale *= SCALE_DECAY;
        self.alive = survives(self.scale, self.alpha);
        self.matrix = Affine2::sprite(self.rotation, self.scale, self.origin, [self.x, self.y]);
        self.alive
    }

    /// Paint the frame through the current transform and alpha
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.set_global_alpha(self.alpha);
        canvas.set_transform(self.matrix);
        canvas.draw_sprite(self.texture, self.frame, self.frame.width, self.frame.height);
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}
