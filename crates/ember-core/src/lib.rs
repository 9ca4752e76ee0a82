//! Ember Core - Foundational types for the Ember particle engine
//!
//! This crate provides the types every other Ember crate depends on:
//! - `Affine2`, `FrameRect`, `Color`, `TextureId` - drawing primitives
//! - `BlendMode` - the 26 canvas compositing operators
//! - `Canvas`, `FilterChain` - the render-target contract
//! - `EngineConfig` - validated, TOML-backed engine settings
//! - Error types and Result alias

mod blend;
mod canvas;
mod config;
mod error;
mod types;

pub use blend::BlendMode;
pub use canvas::{Canvas, FilterChain, FilterOp};
pub use config::{
    BlurSettings, ContrastSettings, EngineConfig, EvictionPolicy, SpriteSettings, MAX_BLUR_RADIUS,
    MAX_CONTRAST,
};
pub use error::{EmberError, Result};
pub use types::{Affine2, Color, FrameRect, TextureId};
