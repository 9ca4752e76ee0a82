//! Render-target contract consumed by the compositor

use crate::blend::BlendMode;
use crate::types::{Affine2, Color, FrameRect, TextureId};
use std::fmt;

/// A single pixel filter, applied to a draw's output before compositing
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    /// Gaussian blur with standard deviation `radius` pixels
    Blur { radius: f32 },
    /// Blurred, offset silhouette of the source painted beneath it
    DropShadow {
        dx: f32,
        dy: f32,
        blur: f32,
        color: Color,
    },
    /// Linear contrast; 100 leaves the image unchanged
    Contrast { percent: f32 },
}

/// Ordered list of filters; empty means no filtering
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterChain(pub Vec<FilterOp>);

impl FilterChain {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn blur(radius: f32) -> Self {
        Self(vec![FilterOp::Blur { radius }])
    }

    /// `drop-shadow(4px 4px 4px black) contrast(percent%)`
    pub fn shadowed_contrast(percent: f32) -> Self {
        Self(vec![
            FilterOp::DropShadow {
                dx: 4.0,
                dy: 4.0,
                blur: 4.0,
                color: Color::BLACK,
            },
            FilterOp::Contrast { percent },
        ])
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ops(&self) -> &[FilterOp] {
        &self.0
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        for (i, op) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match op {
                FilterOp::Blur { radius } => write!(f, "blur({radius}px)")?,
                FilterOp::DropShadow {
                    dx,
                    dy,
                    blur,
                    color,
                } => write!(f, "drop-shadow({dx}px {dy}px {blur}px {color})")?,
                FilterOp::Contrast { percent } => write!(f, "contrast({percent}%)")?,
            }
        }
        Ok(())
    }
}

/// A 2D drawing surface with canvas-style state.
///
/// State set through `set_*` persists across draws until changed. Draws use the
/// current transform (sprites only), global alpha, composite operator and filter.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Reallocate to the given size; contents are cleared
    fn resize(&mut self, width: u32, height: u32);

    /// Whether `set_filter` has any effect on this backend
    fn supports_filters(&self) -> bool;

    fn set_transform(&mut self, transform: Affine2);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_composite_operation(&mut self, mode: BlendMode);
    fn set_filter(&mut self, filter: FilterChain);

    /// Reset transform, alpha, operator and filter to their defaults
    fn reset_state(&mut self) {
        self.set_transform(Affine2::IDENTITY);
        self.set_global_alpha(1.0);
        self.set_composite_operation(BlendMode::SourceOver);
        self.set_filter(FilterChain::none());
    }

    /// Set every pixel to transparent black
    fn clear(&mut self);

    /// Fill a device-space rectangle with `color`
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// Draw `frame` of `texture` into the local rectangle `(0, 0, dest_w, dest_h)`
    fn draw_sprite(&mut self, texture: TextureId, frame: FrameRect, dest_w: f32, dest_h: f32);

    /// Composite all of `source` at the device origin
    fn draw_canvas(&mut self, source: &Self)
    where
        Self: Sized;
}
