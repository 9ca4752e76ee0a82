//! Pixel filters: Gaussian blur, drop shadow, contrast

use crate::pixmap::{new_pixmap, read_pixels, to_premultiplied, write_pixels, Pixel};
use ember_core::{Color, FilterChain, FilterOp, MAX_BLUR_RADIUS};
use tiny_skia::{BlendMode, FilterQuality, Pixmap, PixmapPaint, Transform};

/// Run every filter of `chain` over `pixmap`, in order
pub fn apply_chain(pixmap: &mut Pixmap, chain: &FilterChain) {
    for op in chain.ops() {
        match *op {
            FilterOp::Blur { radius } => gaussian_blur(pixmap, radius),
            FilterOp::DropShadow {
                dx,
                dy,
                blur,
                color,
            } => drop_shadow(pixmap, dx, dy, blur, color),
            FilterOp::Contrast { percent } => contrast(pixmap, percent),
        }
    }
}

/// Box sizes whose three successive passes approximate a Gaussian of `sigma`
fn box_radii(sigma: f32) -> [usize; 3] {
    const PASSES: f32 = 3.0;
    let ideal = (12.0 * sigma * sigma / PASSES + 1.0).sqrt();
    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let lf = lower as f32;
    let m_ideal = (12.0 * sigma * sigma - PASSES * lf * lf - 4.0 * PASSES * lf - 3.0 * PASSES)
        / (-4.0 * lf - 4.0);
    let m = m_ideal.round() as i64;
    let mut radii = [0usize; 3];
    for (i, r) in radii.iter_mut().enumerate() {
        let size = if (i as i64) < m { lower } else { upper };
        *r = ((size - 1) / 2) as usize;
    }
    radii
}

/// Gaussian blur with standard deviation `sigma`, edges treated as transparent.
///
/// `sigma` is capped at `MAX_BLUR_RADIUS`; configs edited through
/// `config_mut` never pass through validation.
pub fn gaussian_blur(pixmap: &mut Pixmap, sigma: f32) {
    let (w, h) = (pixmap.width() as usize, pixmap.height() as usize);
    let mut pixels = read_pixels(pixmap);
    if blur_pixels(&mut pixels, w, h, sigma) {
        write_pixels(pixmap, &pixels);
    }
}

/// Three separable sliding-window box passes; cost is independent of radius.
/// Returns false when nothing was blurred.
fn blur_pixels(pixels: &mut [Pixel], w: usize, h: usize, sigma: f32) -> bool {
    if !(sigma > 0.0) || w == 0 || h == 0 {
        return false;
    }
    let sigma = sigma.min(MAX_BLUR_RADIUS);
    let mut scratch = vec![[0.0; 4]; w * h];
    for radius in box_radii(sigma) {
        if radius == 0 {
            continue;
        }
        box_pass(pixels, &mut scratch, w, h, radius, true);
        box_pass(&scratch, pixels, w, h, radius, false);
    }
    true
}

/// One directional box blur from `src` into `dst`
fn box_pass(src: &[Pixel], dst: &mut [Pixel], w: usize, h: usize, radius: usize, horizontal: bool) {
    let (lines, len) = if horizontal { (h, w) } else { (w, h) };
    let at = |line: usize, i: usize| -> usize {
        if horizontal {
            line * w + i
        } else {
            i * w + line
        }
    };
    let div = (2 * radius + 1) as f32;
    for line in 0..lines {
        let mut sum = [0.0f32; 4];
        for i in 0..=radius.min(len - 1) {
            add(&mut sum, src[at(line, i)], 1.0);
        }
        for i in 0..len {
            let idx = at(line, i);
            dst[idx] = [sum[0] / div, sum[1] / div, sum[2] / div, sum[3] / div];
            let incoming = i + radius + 1;
            if incoming < len {
                add(&mut sum, src[at(line, incoming)], 1.0);
            }
            if i >= radius {
                add(&mut sum, src[at(line, i - radius)], -1.0);
            }
        }
    }
}

fn add(sum: &mut [f32; 4], p: Pixel, sign: f32) {
    for c in 0..4 {
        sum[c] += p[c] * sign;
    }
}

/// Paint a blurred, offset, tinted copy of the pixmap's alpha beneath it
pub fn drop_shadow(pixmap: &mut Pixmap, dx: f32, dy: f32, blur: f32, color: Color) {
    let Ok(mut shadow) = new_pixmap(pixmap.width(), pixmap.height()) else {
        log::warn!("[filter] Skipping drop shadow, no scratch surface");
        return;
    };
    let tint = color.premultiplied();
    for (dst, src) in shadow.pixels_mut().iter_mut().zip(pixmap.pixels()) {
        let a = src.alpha() as f32 / 255.0;
        *dst = to_premultiplied([tint[0] * a, tint[1] * a, tint[2] * a, tint[3] * a]);
    }
    // Shadow blur radius is twice the standard deviation
    gaussian_blur(&mut shadow, blur / 2.0);
    let paint = PixmapPaint {
        opacity: 1.0,
        blend_mode: BlendMode::DestinationOver,
        quality: FilterQuality::Nearest,
    };
    pixmap.draw_pixmap(
        dx.round() as i32,
        dy.round() as i32,
        shadow.as_ref(),
        &paint,
        Transform::identity(),
        None,
    );
}

/// Scale each color channel away from mid-grey by `percent / 100`
pub fn contrast(pixmap: &mut Pixmap, percent: f32) {
    let k = percent / 100.0;
    let mut pixels = read_pixels(pixmap);
    contrast_pixels(&mut pixels, k);
    write_pixels(pixmap, &pixels);
}

fn contrast_pixels(pixels: &mut [Pixel], k: f32) {
    for p in pixels {
        let a = p[3];
        if a <= 0.0 {
            continue;
        }
        for c in 0..3 {
            let straight = p[c] / a;
            p[c] = ((straight - 0.5) * k + 0.5).clamp(0.0, 1.0) * a;
        }
    }
}
