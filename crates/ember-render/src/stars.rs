//! Procedural star sprite sheet, used when no texture file is configured

use ember_core::FrameRect;
use image::{Rgba, RgbaImage};

/// Tints cycled across frames
const TINTS: [[f32; 3]; 5] = [
    [1.0, 0.85, 0.45],
    [0.45, 0.85, 1.0],
    [1.0, 0.45, 0.85],
    [1.0, 0.6, 0.3],
    [0.55, 1.0, 0.55],
];

/// Generate `frame_count` glowing four-point stars in a horizontal strip
pub fn star_sheet(frame_count: usize, frame_width: u32, frame_height: u32) -> RgbaImage {
    star_atlas(&FrameRect::strip(
        frame_count,
        frame_width as f32,
        frame_height as f32,
    ))
}

/// Generate one star per frame rectangle, on a sheet just large enough to
/// hold them all
pub fn star_atlas(frames: &[FrameRect]) -> RgbaImage {
    let width = frames
        .iter()
        .map(|f| (f.x + f.width).ceil().max(0.0) as u32)
        .max()
        .unwrap_or(0);
    let height = frames
        .iter()
        .map(|f| (f.y + f.height).ceil().max(0.0) as u32)
        .max()
        .unwrap_or(0);
    let mut sheet = RgbaImage::new(width, height);
    for (i, frame) in frames.iter().enumerate() {
        let tint = TINTS[i % TINTS.len()];
        // Alternate ray orientation so neighbouring frames differ
        let twist = if i % 2 == 0 { 0.0 } else { std::f32::consts::FRAC_PI_4 };
        let (ox, oy) = (frame.x.max(0.0) as u32, frame.y.max(0.0) as u32);
        let (fw, fh) = (frame.width.round() as u32, frame.height.round() as u32);
        for y in 0..fh.min(height.saturating_sub(oy)) {
            for x in 0..fw.min(width.saturating_sub(ox)) {
                let px = star_pixel(x, y, fw, fh, tint, twist);
                sheet.put_pixel(ox + x, oy + y, px);
            }
        }
    }
    sheet
}

fn star_pixel(x: u32, y: u32, w: u32, h: u32, tint: [f32; 3], twist: f32) -> Rgba<u8> {
    let half_w = w as f32 / 2.0;
    let half_h = h as f32 / 2.0;
    let nx = (x as f32 + 0.5 - half_w) / half_w;
    let ny = (y as f32 + 0.5 - half_h) / half_h;
    let r = (nx * nx + ny * ny).sqrt();
    if r >= 1.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let (sin, cos) = twist.sin_cos();
    let u = nx * cos - ny * sin;
    let v = nx * sin + ny * cos;
    let falloff = 1.0 - r;
    let core = (-(r / 0.18).powi(2)).exp();
    let rays = (-u.abs() * 28.0).exp().max((-v.abs() * 28.0).exp()) * falloff * falloff;
    let halo = falloff.powi(3) * 0.35;
    let intensity = (core + rays + halo).min(1.0);

    // Whiter toward the core
    let white = core.min(1.0);
    let channel = |t: f32| {
        let c = t + (1.0 - t) * white;
        (c.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    Rgba([
        channel(tint[0]),
        channel(tint[1]),
        channel(tint[2]),
        (intensity * 255.0).round() as u8,
    ])
}
