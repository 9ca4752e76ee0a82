//! Pixel compositing operators

use crate::error::EmberError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compositing operator applied when drawing over existing pixels.
///
/// Names follow the 2D canvas `globalCompositeOperation` values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub const ALL: [BlendMode; 26] = [
        BlendMode::SourceOver,
        BlendMode::SourceIn,
        BlendMode::SourceOut,
        BlendMode::SourceAtop,
        BlendMode::DestinationOver,
        BlendMode::DestinationIn,
        BlendMode::DestinationOut,
        BlendMode::DestinationAtop,
        BlendMode::Lighter,
        BlendMode::Copy,
        BlendMode::Xor,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::SourceOver => "source-over",
            BlendMode::SourceIn => "source-in",
            BlendMode::SourceOut => "source-out",
            BlendMode::SourceAtop => "source-atop",
            BlendMode::DestinationOver => "destination-over",
            BlendMode::DestinationIn => "destination-in",
            BlendMode::DestinationOut => "destination-out",
            BlendMode::DestinationAtop => "destination-atop",
            BlendMode::Lighter => "lighter",
            BlendMode::Copy => "copy",
            BlendMode::Xor => "xor",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
        }
    }

    /// Human-readable label for settings listings
    pub fn label(&self) -> &'static str {
        match self {
            BlendMode::SourceOver => "Source Over",
            BlendMode::SourceIn => "Source In",
            BlendMode::SourceOut => "Source Out",
            BlendMode::SourceAtop => "Source Atop",
            BlendMode::DestinationOver => "Destination Over",
            BlendMode::DestinationIn => "Destination In",
            BlendMode::DestinationOut => "Destination Out",
            BlendMode::DestinationAtop => "Destination Atop",
            BlendMode::Lighter => "Lighter",
            BlendMode::Copy => "Copy",
            BlendMode::Xor => "Xor",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
            BlendMode::Darken => "Darken",
            BlendMode::Lighten => "Lighten",
            BlendMode::ColorDodge => "Color Dodge",
            BlendMode::ColorBurn => "Color Burn",
            BlendMode::HardLight => "Hard Light",
            BlendMode::SoftLight => "Soft Light",
            BlendMode::Difference => "Difference",
            BlendMode::Exclusion => "Exclusion",
            BlendMode::Hue => "Hue",
            BlendMode::Saturation => "Saturation",
            BlendMode::Color => "Color",
            BlendMode::Luminosity => "Luminosity",
        }
    }

    /// Operators that also modify destination pixels the source does not cover
    pub fn is_unbounded(&self) -> bool {
        matches!(
            self,
            BlendMode::SourceIn
                | BlendMode::SourceOut
                | BlendMode::DestinationIn
                | BlendMode::DestinationAtop
                | BlendMode::Copy
        )
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlendMode {
    type Err = EmberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        BlendMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == needle)
            .ok_or_else(|| EmberError::InvalidEnumValue {
                value: s.to_string(),
                allowed: BlendMode::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            })
    }
}
