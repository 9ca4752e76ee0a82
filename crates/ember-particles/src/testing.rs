//! Canvas test double that records every call

use ember_core::{Affine2, BlendMode, Canvas, Color, FilterChain, FrameRect, TextureId};

#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    Resize(u32, u32),
    Clear,
    FillRect { color: Color, mode: BlendMode },
    DrawSprite {
        frame: FrameRect,
        alpha: f32,
        transform: Affine2,
        mode: BlendMode,
    },
    DrawCanvas { filter: FilterChain, mode: BlendMode },
}

pub struct RecordingCanvas {
    pub width: u32,
    pub height: u32,
    pub filters: bool,
    pub transform: Affine2,
    pub alpha: f32,
    pub mode: BlendMode,
    pub filter: FilterChain,
    pub ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32, filters: bool) -> Self {
        Self {
            width,
            height,
            filters,
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            mode: BlendMode::SourceOver,
            filter: FilterChain::none(),
            ops: Vec::new(),
        }
    }

    pub fn draw_canvas_ops(&self) -> Vec<&CanvasOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::DrawCanvas { .. }))
            .collect()
    }

    pub fn sprite_draws(&self) -> Vec<&CanvasOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::DrawSprite { .. }))
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.ops.push(CanvasOp::Resize(width, height));
    }

    fn supports_filters(&self) -> bool {
        self.filters
    }

    fn set_transform(&mut self, transform: Affine2) {
        self.transform = transform;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn set_composite_operation(&mut self, mode: BlendMode) {
        self.mode = mode;
    }

    fn set_filter(&mut self, filter: FilterChain) {
        self.filter = filter;
    }

    fn clear(&mut self) {
        self.ops.push(CanvasOp::Clear);
    }

    fn fill_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32, color: Color) {
        self.ops.push(CanvasOp::FillRect {
            color,
            mode: self.mode,
        });
    }

    fn draw_sprite(&mut self, _texture: TextureId, frame: FrameRect, _dest_w: f32, _dest_h: f32) {
        self.ops.push(CanvasOp::DrawSprite {
            frame,
            alpha: self.alpha,
            transform: self.transform,
            mode: self.mode,
        });
    }

    fn draw_canvas(&mut self, _source: &Self) {
        self.ops.push(CanvasOp::DrawCanvas {
            filter: self.filter.clone(),
            mode: self.mode,
        });
    }
}
