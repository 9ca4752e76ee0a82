//! Engine configuration (TOML-backed, validated at construction)

use crate::blend::BlendMode;
use crate::error::{EmberError, Result};
use crate::types::{Color, FrameRect};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What happens to the oldest particle when the active list is full
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvictionPolicy {
    /// Reinitialize the evicted particle as the new spawn
    #[default]
    Reuse,
    /// Drop the evicted particle; the spawn is served from the pool or a fresh allocation
    Discard,
}

/// Soft underlay glow pass
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurSettings {
    pub enabled: bool,
    /// Blur radius in pixels
    pub radius: f32,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 50.0,
        }
    }
}

/// Sharp contrast-boosted overlay pass
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastSettings {
    pub enabled: bool,
    /// Contrast in percent (100 = unchanged)
    pub amount: f32,
}

impl Default for ContrastSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            amount: 300.0,
        }
    }
}

/// Sprite sheet source: a horizontal strip of equally sized frames, or an
/// explicit list of frame rectangles
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteSettings {
    /// Image file; when absent a procedural star sheet is generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<PathBuf>,
    pub frame_count: usize,
    pub frame_width: f32,
    pub frame_height: f32,
    /// Overrides the strip layout when non-empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<FrameRect>,
}

impl Default for SpriteSettings {
    fn default() -> Self {
        Self {
            texture: None,
            frame_count: 5,
            frame_width: 80.0,
            frame_height: 80.0,
            frames: Vec::new(),
        }
    }
}

impl SpriteSettings {
    pub fn frames(&self) -> Vec<FrameRect> {
        if self.frames.is_empty() {
            FrameRect::strip(self.frame_count, self.frame_width, self.frame_height)
        } else {
            self.frames.clone()
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.frames.is_empty() {
            for (i, frame) in self.frames.iter().enumerate() {
                let placed = [frame.x, frame.y].iter().all(|v| v.is_finite() && *v >= 0.0);
                let sized = [frame.width, frame.height]
                    .iter()
                    .all(|v| v.is_finite() && *v > 0.0);
                if !placed || !sized {
                    return Err(EmberError::InvalidConfig(format!(
                        "sprite.frames[{i}] must have a non-negative origin and positive size, got {frame:?}"
                    )));
                }
            }
            return Ok(());
        }
        if self.frame_count == 0 {
            return Err(EmberError::InvalidConfig(
                "sprite.frame_count must be at least 1".into(),
            ));
        }
        for (field, value) in [
            ("sprite.frame_width", self.frame_width),
            ("sprite.frame_height", self.frame_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EmberError::InvalidConfig(format!(
                    "{field} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Full engine configuration. Every field may be changed after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_particles: usize,
    pub background_color: Color,
    pub blend_mode: BlendMode,
    pub blur: BlurSettings,
    pub contrast: ContrastSettings,
    pub sprite: SpriteSettings,
    pub eviction: EvictionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_particles: 2000,
            background_color: Color::from_hex(0x111111),
            blend_mode: BlendMode::Lighter,
            blur: BlurSettings::default(),
            contrast: ContrastSettings::default(),
            sprite: SpriteSettings::default(),
            eviction: EvictionPolicy::Reuse,
        }
    }
}

/// Upper bound accepted for the blur radius
pub const MAX_BLUR_RADIUS: f32 = 200.0;
/// Upper bound accepted for the contrast amount
pub const MAX_CONTRAST: f32 = 400.0;

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_toml_str(&source)?;
        // Texture paths are relative to the config file
        if let (Some(texture), Some(dir)) = (&config.sprite.texture, path.as_ref().parent()) {
            if texture.is_relative() {
                config.sprite.texture = Some(dir.join(texture));
            }
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn frames(&self) -> Vec<FrameRect> {
        self.sprite.frames()
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_particles == 0 {
            return Err(EmberError::InvalidConfig(
                "max_particles must be at least 1".into(),
            ));
        }
        self.sprite.validate()?;
        check_range("blur.radius", self.blur.radius, 0.0, MAX_BLUR_RADIUS)?;
        check_range("contrast.amount", self.contrast.amount, 0.0, MAX_CONTRAST)?;
        Ok(())
    }
}

fn check_range(field: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(EmberError::ValueOutOfRange {
            field: field.to_string(),
            min: min as f64,
            max: max as f64,
            value: value as f64,
        });
    }
    Ok(())
}
