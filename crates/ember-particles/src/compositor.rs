//! Two-surface compositor: particles into an off-screen buffer, then a
//! blurred underlay and a sharp overlay onto the visible surface

use crate::particle::Particle;
use ember_core::{Canvas, EngineConfig, FilterChain};

/// Owns the visible and off-screen surfaces
pub struct Compositor<C: Canvas> {
    visible: C,
    buffer: C,
    supports_filters: bool,
}

impl<C: Canvas> Compositor<C> {
    /// Probes filter support once; the result never changes afterwards
    pub fn new(visible: C, buffer: C) -> Self {
        let supports_filters = visible.supports_filters();
        log::info!("[compositor] Supports filters: {}", supports_filters);
        Self {
            visible,
            buffer,
            supports_filters,
        }
    }

    pub fn supports_filters(&self) -> bool {
        self.supports_filters
    }

    pub fn width(&self) -> u32 {
        self.visible.width()
    }

    pub fn height(&self) -> u32 {
        self.visible.height()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.visible.resize(width, height);
        self.buffer.resize(width, height);
    }

    pub fn visible(&self) -> &C {
        &self.visible
    }

    pub fn buffer(&self) -> &C {
        &self.buffer
    }

    /// Draw one frame; returns how many times the buffer was composited
    pub fn render<'a>(
        &mut self,
        particles: impl IntoIterator<Item = &'a Particle>,
        config: &EngineConfig,
    ) -> usize {
        let (w, h) = (self.visible.width() as f32, self.visible.height() as f32);

        self.visible.reset_state();
        self.visible
            .fill_rect(0.0, 0.0, w, h, config.background_color.opaque());

        self.buffer.reset_state();
        self.buffer.clear();
        self.buffer.set_composite_operation(config.blend_mode);
        for particle in particles {
            particle.draw(&mut self.buffer);
        }

        let mut passes = 0;
        if self.supports_filters {
            if config.blur.enabled {
                self.visible.set_filter(FilterChain::blur(config.blur.radius));
                self.visible.draw_canvas(&self.buffer);
                passes += 1;
            }
            // Without contrast the overlay keeps whatever filter is current
            if config.contrast.enabled {
                self.visible
                    .set_filter(FilterChain::shadowed_contrast(config.contrast.amount));
            }
        }
        self.visible.draw_canvas(&self.buffer);
        passes += 1;

        if self.supports_filters {
            self.visible.set_filter(FilterChain::none());
        }
        passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CanvasOp, RecordingCanvas};
    use ember_core::{BlendMode, FrameRect, TextureId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn compositor(filters: bool) -> Compositor<RecordingCanvas> {
        Compositor::new(
            RecordingCanvas::new(320, 200, filters),
            RecordingCanvas::new(320, 200, filters),
        )
    }

    fn live_particles(n: usize) -> Vec<Particle> {
        let mut rng = StdRng::seed_from_u64(21);
        (0..n)
            .map(|i| {
                let mut p = Particle::new(TextureId(0), FrameRect::new(0.0, 0.0, 80.0, 80.0));
                p.init(i as f32 * 10.0, 5.0, &mut rng);
                p.update(&mut rng);
                p
            })
            .collect()
    }

    fn config(blend: BlendMode, blur: bool, contrast: bool) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.blend_mode = blend;
        config.blur.enabled = blur;
        config.contrast.enabled = contrast;
        config
    }

    #[test]
    fn lighter_without_post_process_composites_once_unfiltered() {
        let mut c = compositor(true);
        let passes = c.render(&live_particles(3), &config(BlendMode::Lighter, false, false));
        assert_eq!(passes, 1);
        let draws = c.visible().draw_canvas_ops();
        assert_eq!(draws.len(), 1);
        assert_eq!(
            draws[0],
            &CanvasOp::DrawCanvas {
                filter: FilterChain::none(),
                mode: BlendMode::SourceOver
            }
        );
        assert!(c
            .buffer()
            .sprite_draws()
            .iter()
            .all(|op| matches!(op, CanvasOp::DrawSprite { mode: BlendMode::Lighter, .. })));
    }

    #[test]
    fn unsupported_filters_composite_once_regardless_of_toggles() {
        for (blur, contrast) in [(true, true), (true, false), (false, true), (false, false)] {
            let mut c = compositor(false);
            assert!(!c.supports_filters());
            let passes = c.render(&live_particles(2), &config(BlendMode::Screen, blur, contrast));
            assert_eq!(passes, 1);
            let draws = c.visible().draw_canvas_ops();
            assert_eq!(draws.len(), 1);
            assert!(matches!(draws[0], CanvasOp::DrawCanvas { filter, .. } if filter.is_none()));
        }
    }

    #[test]
    fn full_glow_draws_blurred_underlay_then_contrast_overlay() {
        let mut c = compositor(true);
        let cfg = config(BlendMode::Lighter, true, true);
        let passes = c.render(&live_particles(2), &cfg);
        assert_eq!(passes, 2);
        let draws = c.visible().draw_canvas_ops();
        assert_eq!(
            draws,
            vec![
                &CanvasOp::DrawCanvas {
                    filter: FilterChain::blur(50.0),
                    mode: BlendMode::SourceOver
                },
                &CanvasOp::DrawCanvas {
                    filter: FilterChain::shadowed_contrast(300.0),
                    mode: BlendMode::SourceOver
                },
            ]
        );
        assert!(c.visible().filter.is_none());
    }

    #[test]
    fn blur_only_draws_both_passes_blurred() {
        let mut c = compositor(true);
        let passes = c.render(&live_particles(1), &config(BlendMode::Lighter, true, false));
        assert_eq!(passes, 2);
        let draws = c.visible().draw_canvas_ops();
        let blurred = CanvasOp::DrawCanvas {
            filter: FilterChain::blur(50.0),
            mode: BlendMode::SourceOver,
        };
        assert_eq!(draws, vec![&blurred, &blurred]);
        assert!(c.visible().filter.is_none());
    }

    #[test]
    fn contrast_only_draws_single_filtered_pass() {
        let mut c = compositor(true);
        let passes = c.render(&live_particles(1), &config(BlendMode::Lighter, false, true));
        assert_eq!(passes, 1);
        let draws = c.visible().draw_canvas_ops();
        assert!(matches!(
            draws[0],
            CanvasOp::DrawCanvas { filter, .. } if *filter == FilterChain::shadowed_contrast(300.0)
        ));
    }

    #[test]
    fn frame_starts_with_opaque_background_and_cleared_buffer() {
        let mut c = compositor(true);
        let mut cfg = config(BlendMode::Multiply, false, false);
        cfg.background_color = "#11223380".parse().unwrap();
        c.render(&live_particles(4), &cfg);

        match &c.visible().ops[0] {
            CanvasOp::FillRect { color, mode } => {
                assert_eq!(color.a, 1.0);
                assert_eq!(*mode, BlendMode::SourceOver);
            }
            other => panic!("expected background fill, got {other:?}"),
        }
        assert_eq!(c.buffer().ops[0], CanvasOp::Clear);
        assert_eq!(c.buffer().sprite_draws().len(), 4);
    }

    #[test]
    fn particles_draw_in_sequence_order() {
        let mut c = compositor(true);
        let particles = live_particles(5);
        c.render(&particles, &config(BlendMode::Xor, false, false));
        let txs: Vec<f32> = c
            .buffer()
            .sprite_draws()
            .iter()
            .map(|op| match op {
                CanvasOp::DrawSprite { transform, .. } => transform.tx,
                _ => unreachable!(),
            })
            .collect();
        let expected: Vec<f32> = particles.iter().map(|p| p.matrix.tx).collect();
        assert_eq!(txs, expected);
    }
}
