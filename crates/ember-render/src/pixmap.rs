//! Conversions between straight-alpha `image` buffers and premultiplied pixmaps

use ember_core::{Color, EmberError, Result};
use image::{Rgba, RgbaImage};
use tiny_skia::{ColorU8, IntSize, Pixmap, PremultipliedColorU8};

/// Premultiplied RGBA in [0, 1], used by the filters for accumulation
pub type Pixel = [f32; 4];

/// Transparent pixmap of at least 1x1
pub fn new_pixmap(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| EmberError::Render(format!("Cannot allocate a {width}x{height} surface")))
}

/// Premultiply a decoded image into a pixmap
pub fn pixmap_from_image(image: &RgbaImage) -> Result<Pixmap> {
    let (width, height) = image.dimensions();
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| EmberError::Asset(format!("Image has no pixels ({width}x{height})")))?;
    let data = image
        .pixels()
        .flat_map(|p| {
            let c = ColorU8::from_rgba(p[0], p[1], p[2], p[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
        .ok_or_else(|| EmberError::Asset(format!("Image too large ({width}x{height})")))
}

/// Demultiply a pixmap back into a straight-alpha image
pub fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

/// Straight-alpha color at `(x, y)`; transparent outside the pixmap
pub fn pixel_color(pixmap: &Pixmap, x: u32, y: u32) -> Color {
    match pixmap.pixel(x, y) {
        Some(p) => {
            let c = p.demultiply();
            Color::new(
                c.red() as f32 / 255.0,
                c.green() as f32 / 255.0,
                c.blue() as f32 / 255.0,
                c.alpha() as f32 / 255.0,
            )
        }
        None => Color::TRANSPARENT,
    }
}

pub(crate) fn read_pixels(pixmap: &Pixmap) -> Vec<Pixel> {
    pixmap
        .pixels()
        .iter()
        .map(|p| {
            [
                p.red() as f32 / 255.0,
                p.green() as f32 / 255.0,
                p.blue() as f32 / 255.0,
                p.alpha() as f32 / 255.0,
            ]
        })
        .collect()
}

pub(crate) fn write_pixels(pixmap: &mut Pixmap, pixels: &[Pixel]) {
    for (dst, p) in pixmap.pixels_mut().iter_mut().zip(pixels) {
        *dst = to_premultiplied(*p);
    }
}

/// Quantize, keeping every color channel at or below alpha
pub(crate) fn to_premultiplied(p: Pixel) -> PremultipliedColorU8 {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    let a = q(p[3]);
    PremultipliedColorU8::from_rgba(q(p[0]).min(a), q(p[1]).min(a), q(p[2]).min(a), a)
        .unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_conversion_premultiplies_and_round_trips() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 128]));
        img.put_pixel(1, 0, Rgba([10, 20, 30, 0]));
        let pixmap = pixmap_from_image(&img).unwrap();
        let p = pixmap.pixel(0, 0).unwrap();
        assert_eq!((p.red(), p.alpha()), (128, 128));
        assert_eq!(pixmap.pixel(1, 0).unwrap().alpha(), 0);

        let back = pixmap_to_image(&pixmap);
        assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0, 128]);
    }

    #[test]
    fn empty_image_is_asset_error() {
        let err = pixmap_from_image(&RgbaImage::new(0, 3)).unwrap_err();
        assert!(matches!(err, EmberError::Asset(_)));
    }

    #[test]
    fn zero_sized_surface_is_raised_to_one_pixel() {
        let pixmap = new_pixmap(0, 0).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (1, 1));
    }

    #[test]
    fn quantizing_never_exceeds_alpha() {
        let p = to_premultiplied([0.52, 0.1, 0.0, 0.5]);
        assert!(p.red() <= p.alpha());
        assert_eq!(p.alpha(), 128);
    }

    #[test]
    fn pixel_color_outside_is_transparent() {
        let pixmap = new_pixmap(2, 2).unwrap();
        assert_eq!(pixel_color(&pixmap, 5, 5), Color::TRANSPARENT);
    }
}
