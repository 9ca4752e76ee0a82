//! Ember Render - software raster backend
//!
//! Implements the `ember_core::Canvas` contract on the CPU:
//! - tiny-skia pixmaps for sprites, fills and every canvas compositing operator
//! - Gaussian blur, drop shadow and contrast filters
//! - a name-keyed texture cache and a procedural star sprite sheet

mod filter;
mod pixmap;
mod raster;
mod stars;
mod texture_cache;

pub use filter::{apply_chain, contrast, drop_shadow, gaussian_blur};
pub use pixmap::{new_pixmap, pixel_color, pixmap_from_image, pixmap_to_image, Pixel};
pub use raster::{skia_blend, RasterCanvas};
pub use stars::{star_atlas, star_sheet};
pub use texture_cache::{Texture, TextureCache};
