//! Software raster canvas on top of a tiny-skia pixmap

use crate::filter::apply_chain;
use crate::pixmap::{new_pixmap, pixel_color, pixmap_to_image};
use crate::texture_cache::TextureCache;
use ember_core::{
    Affine2, BlendMode, Canvas, Color, EmberError, FilterChain, FrameRect, Result, TextureId,
};
use std::path::Path;
use std::sync::Arc;
use tiny_skia::{FilterQuality, Paint, Pattern, Pixmap, PixmapPaint, Rect, SpreadMode, Transform};

/// Mutable drawing state, mirroring a 2D canvas context
#[derive(Clone, Debug)]
struct DrawState {
    transform: Affine2,
    alpha: f32,
    mode: BlendMode,
    filter: FilterChain,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            mode: BlendMode::SourceOver,
            filter: FilterChain::none(),
        }
    }
}

/// CPU canvas backed by a premultiplied RGBA8 pixmap
pub struct RasterCanvas {
    pixmap: Pixmap,
    state: DrawState,
    textures: Arc<TextureCache>,
    filters: bool,
}

/// Canvas operator to tiny-skia blend mode
pub fn skia_blend(mode: BlendMode) -> tiny_skia::BlendMode {
    use tiny_skia::BlendMode as Sk;
    match mode {
        BlendMode::SourceOver => Sk::SourceOver,
        BlendMode::SourceIn => Sk::SourceIn,
        BlendMode::SourceOut => Sk::SourceOut,
        BlendMode::SourceAtop => Sk::SourceAtop,
        BlendMode::DestinationOver => Sk::DestinationOver,
        BlendMode::DestinationIn => Sk::DestinationIn,
        BlendMode::DestinationOut => Sk::DestinationOut,
        BlendMode::DestinationAtop => Sk::DestinationAtop,
        BlendMode::Lighter => Sk::Plus,
        BlendMode::Copy => Sk::Source,
        BlendMode::Xor => Sk::Xor,
        BlendMode::Multiply => Sk::Multiply,
        BlendMode::Screen => Sk::Screen,
        BlendMode::Overlay => Sk::Overlay,
        BlendMode::Darken => Sk::Darken,
        BlendMode::Lighten => Sk::Lighten,
        BlendMode::ColorDodge => Sk::ColorDodge,
        BlendMode::ColorBurn => Sk::ColorBurn,
        BlendMode::HardLight => Sk::HardLight,
        BlendMode::SoftLight => Sk::SoftLight,
        BlendMode::Difference => Sk::Difference,
        BlendMode::Exclusion => Sk::Exclusion,
        BlendMode::Hue => Sk::Hue,
        BlendMode::Saturation => Sk::Saturation,
        BlendMode::Color => Sk::Color,
        BlendMode::Luminosity => Sk::Luminosity,
    }
}

fn skia_transform(m: Affine2) -> Transform {
    Transform::from_row(m.a, m.b, m.c, m.d, m.tx, m.ty)
}

fn skia_color(color: Color, alpha: f32) -> Option<tiny_skia::Color> {
    tiny_skia::Color::from_rgba(
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0),
        (color.a * alpha).clamp(0.0, 1.0),
    )
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, textures: Arc<TextureCache>) -> Result<Self> {
        Ok(Self {
            pixmap: new_pixmap(width, height)?,
            state: DrawState::default(),
            textures,
            filters: true,
        })
    }

    /// A canvas whose backend reports no filter support; `set_filter` is ignored
    pub fn without_filters(width: u32, height: u32, textures: Arc<TextureCache>) -> Result<Self> {
        Ok(Self {
            filters: false,
            ..Self::new(width, height, textures)?
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha color at `(x, y)`; transparent outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        pixel_color(&self.pixmap, x, y)
    }

    pub fn to_image(&self) -> image::RgbaImage {
        pixmap_to_image(&self.pixmap)
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_image().save(path).map_err(|e| {
            EmberError::Render(format!("Failed to write '{}': {}", path.display(), e))
        })
    }

    /// Blank surface the size of this canvas for filtered or unbounded draws
    fn scratch(&self) -> Option<Pixmap> {
        match new_pixmap(self.pixmap.width(), self.pixmap.height()) {
            Ok(pixmap) => Some(pixmap),
            Err(e) => {
                log::warn!("[raster] {}", e);
                None
            }
        }
    }

    /// Draws go straight to the surface unless a filter must run first or the
    /// operator also affects pixels outside the shape
    fn needs_scratch(&self) -> bool {
        !self.state.filter.is_none() || self.state.mode.is_unbounded()
    }

    /// Filter a full-size source, then composite it at the origin with
    /// current alpha and operator
    fn composite(&mut self, mut source: Pixmap) {
        if !self.state.filter.is_none() {
            apply_chain(&mut source, &self.state.filter);
        }
        let paint = PixmapPaint {
            opacity: self.state.alpha,
            blend_mode: skia_blend(self.state.mode),
            quality: FilterQuality::Nearest,
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &paint,
            Transform::identity(),
            None,
        );
    }
}

/// Paint `sprite` stretched over `(0, 0, dest_w, dest_h)` in the space of `transform`
fn paint_sprite(
    target: &mut Pixmap,
    sprite: &Pixmap,
    transform: Affine2,
    (mode, opacity): (tiny_skia::BlendMode, f32),
    (dest_w, dest_h): (f32, f32),
) {
    if transform.inverse().is_none() {
        return;
    }
    let Some(rect) = Rect::from_xywh(0.0, 0.0, dest_w, dest_h) else {
        return;
    };
    let scale = Transform::from_scale(
        dest_w / sprite.width() as f32,
        dest_h / sprite.height() as f32,
    );
    let shader = Pattern::new(
        sprite.as_ref(),
        SpreadMode::Pad,
        FilterQuality::Bilinear,
        opacity,
        scale,
    );
    let paint = Paint {
        shader,
        blend_mode: mode,
        anti_alias: true,
        ..Paint::default()
    };
    target.fill_rect(rect, &paint, skia_transform(transform), None);
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        match new_pixmap(width, height) {
            Ok(pixmap) => self.pixmap = pixmap,
            Err(e) => log::warn!("[raster] Keeping old surface: {}", e),
        }
    }

    fn supports_filters(&self) -> bool {
        self.filters
    }

    fn set_transform(&mut self, transform: Affine2) {
        self.state.transform = transform;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.state.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn set_composite_operation(&mut self, mode: BlendMode) {
        self.state.mode = mode;
    }

    fn set_filter(&mut self, filter: FilterChain) {
        if self.filters {
            self.state.filter = filter;
        }
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let mut paint = Paint {
            anti_alias: false,
            ..Paint::default()
        };
        if self.needs_scratch() {
            let Some(mut scratch) = self.scratch() else {
                return;
            };
            if let Some(c) = skia_color(color, 1.0) {
                paint.set_color(c);
                scratch.fill_rect(rect, &paint, Transform::identity(), None);
            }
            self.composite(scratch);
        } else if let Some(c) = skia_color(color, self.state.alpha) {
            paint.set_color(c);
            paint.blend_mode = skia_blend(self.state.mode);
            self.pixmap
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn draw_sprite(&mut self, texture: TextureId, frame: FrameRect, dest_w: f32, dest_h: f32) {
        let Some(sprite) = self.textures.get(texture).and_then(|t| t.frame(&frame)) else {
            log::trace!("[raster] Nothing to draw for {:?} {:?}", texture, frame);
            return;
        };
        let transform = self.state.transform;
        if self.needs_scratch() {
            let Some(mut scratch) = self.scratch() else {
                return;
            };
            paint_sprite(
                &mut scratch,
                &sprite,
                transform,
                (tiny_skia::BlendMode::SourceOver, 1.0),
                (dest_w, dest_h),
            );
            self.composite(scratch);
        } else {
            let mode = (skia_blend(self.state.mode), self.state.alpha);
            paint_sprite(&mut self.pixmap, &sprite, transform, mode, (dest_w, dest_h));
        }
    }

    fn draw_canvas(&mut self, source: &Self) {
        self.composite(source.pixmap.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_texture() -> (Arc<TextureCache>, TextureId) {
        let mut cache = TextureCache::new();
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 255, 255, 255]));
        let id = cache.insert_image("white", &img).unwrap();
        (Arc::new(cache), id)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 2.0 / 255.0
    }

    fn centered_sprite(canvas: &mut RasterCanvas, id: TextureId, scale: f32, at: [f32; 2]) {
        canvas.set_transform(Affine2::sprite(0.0, scale, [4.0, 4.0], at));
        canvas.draw_sprite(id, FrameRect::new(0.0, 0.0, 8.0, 8.0), 8.0, 8.0);
    }

    #[test]
    fn fill_rect_overwrites_opaque() {
        let (textures, _) = white_texture();
        let mut canvas = RasterCanvas::new(4, 4, textures).unwrap();
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0, Color::from_hex(0x111111));
        let p = canvas.pixel(3, 3);
        assert!(close(p.r, 17.0 / 255.0));
        assert_eq!(p.a, 1.0);
    }

    #[test]
    fn sprite_lands_under_transform() {
        let (textures, id) = white_texture();
        let mut canvas = RasterCanvas::new(32, 32, textures).unwrap();
        canvas.set_global_alpha(0.5);
        centered_sprite(&mut canvas, id, 1.0, [16.0, 16.0]);
        assert!(close(canvas.pixel(16, 16).a, 0.5));
        assert!(close(canvas.pixel(12, 12).a, 0.5));
        assert_eq!(canvas.pixel(11, 16).a, 0.0);
        assert_eq!(canvas.pixel(20, 16).a, 0.0);
    }

    #[test]
    fn bounded_sprite_leaves_rest_of_wide_canvas_untouched() {
        let (textures, id) = white_texture();
        let mut canvas = RasterCanvas::new(2048, 16, textures).unwrap();
        canvas.fill_rect(0.0, 0.0, 2048.0, 16.0, Color::BLACK);
        let before = canvas.pixmap().clone();
        canvas.set_composite_operation(BlendMode::Lighter);
        centered_sprite(&mut canvas, id, 1.0, [8.0, 8.0]);
        let changed: Vec<usize> = before
            .pixels()
            .iter()
            .zip(canvas.pixmap().pixels())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i % 2048)
            .collect();
        assert!(!changed.is_empty());
        assert!(changed.iter().all(|&x| x < 12));
    }

    #[test]
    fn copy_operator_clears_outside_source() {
        let (textures, id) = white_texture();
        let mut canvas = RasterCanvas::new(16, 16, textures).unwrap();
        canvas.fill_rect(0.0, 0.0, 16.0, 16.0, Color::BLACK);
        canvas.set_composite_operation(BlendMode::Copy);
        centered_sprite(&mut canvas, id, 0.5, [4.0, 4.0]);
        assert_eq!(canvas.pixel(4, 4).a, 1.0);
        assert_eq!(canvas.pixel(12, 12), Color::TRANSPARENT);
    }

    #[test]
    fn source_in_keeps_only_the_overlap() {
        let (textures, id) = white_texture();
        let mut canvas = RasterCanvas::new(16, 16, textures).unwrap();
        canvas.fill_rect(0.0, 0.0, 8.0, 16.0, Color::BLACK);
        canvas.set_composite_operation(BlendMode::SourceIn);
        centered_sprite(&mut canvas, id, 1.0, [8.0, 8.0]);
        // Overlap turns white, destination outside the sprite is erased
        let overlap = canvas.pixel(6, 8);
        assert_eq!((overlap.r, overlap.a), (1.0, 1.0));
        assert_eq!(canvas.pixel(1, 1).a, 0.0);
        // Sprite outside the destination stays transparent
        assert_eq!(canvas.pixel(10, 8).a, 0.0);
    }

    #[test]
    fn lighter_adds_overlapping_sprites() {
        let mut cache = TextureCache::new();
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([100, 0, 0, 255]));
        let id = cache.insert_image("red", &img).unwrap();
        let mut canvas = RasterCanvas::new(16, 16, Arc::new(cache)).unwrap();
        canvas.set_composite_operation(BlendMode::Lighter);
        centered_sprite(&mut canvas, id, 1.0, [8.0, 8.0]);
        centered_sprite(&mut canvas, id, 1.0, [8.0, 8.0]);
        let p = canvas.pixmap().pixel(8, 8).unwrap();
        assert!((p.red() as i32 - 200).abs() <= 2);
        assert_eq!(p.alpha(), 255);
    }

    #[test]
    fn every_operator_maps_to_a_distinct_skia_mode() {
        let mapped: Vec<_> = BlendMode::ALL.iter().map(|m| skia_blend(*m)).collect();
        for (i, a) in mapped.iter().enumerate() {
            for b in &mapped[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(skia_blend(BlendMode::Lighter), tiny_skia::BlendMode::Plus);
        assert_eq!(skia_blend(BlendMode::Copy), tiny_skia::BlendMode::Source);
    }

    #[test]
    fn degenerate_transform_draws_nothing() {
        let (textures, id) = white_texture();
        let mut canvas = RasterCanvas::new(16, 16, textures).unwrap();
        centered_sprite(&mut canvas, id, 0.0, [8.0, 8.0]);
        assert!(canvas.pixmap().pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn draw_canvas_applies_filter_only_when_supported() {
        let (textures, id) = white_texture();
        let mut buffer = RasterCanvas::new(32, 32, textures.clone()).unwrap();
        centered_sprite(&mut buffer, id, 1.0, [16.0, 16.0]);

        let mut filtered = RasterCanvas::new(32, 32, textures.clone()).unwrap();
        filtered.set_filter(FilterChain::blur(3.0));
        filtered.draw_canvas(&buffer);
        assert!(filtered.pixel(16, 16).a < 1.0);
        assert!(filtered.pixel(10, 16).a > 0.0);

        let mut plain = RasterCanvas::without_filters(32, 32, textures).unwrap();
        assert!(!plain.supports_filters());
        plain.set_filter(FilterChain::blur(3.0));
        plain.draw_canvas(&buffer);
        assert_eq!(plain.pixel(16, 16).a, 1.0);
        assert_eq!(plain.pixel(10, 16).a, 0.0);
    }

    #[test]
    fn resize_replaces_surface() {
        let (textures, _) = white_texture();
        let mut canvas = RasterCanvas::new(4, 4, textures).unwrap();
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0, Color::WHITE);
        canvas.resize(10, 6);
        assert_eq!((canvas.width(), canvas.height()), (10, 6));
        assert_eq!(canvas.pixel(0, 0), Color::TRANSPARENT);
    }

    #[test]
    fn reset_state_restores_defaults() {
        let (textures, _) = white_texture();
        let mut canvas = RasterCanvas::new(2, 2, textures).unwrap();
        canvas.set_global_alpha(0.1);
        canvas.set_composite_operation(BlendMode::Xor);
        canvas.reset_state();
        canvas.fill_rect(0.0, 0.0, 2.0, 2.0, Color::WHITE);
        assert_eq!(canvas.pixel(0, 0), Color::WHITE);
    }
}
