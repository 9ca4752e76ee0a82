//! Texture cache: loads sprite sheets and hands out `TextureId` handles

use crate::pixmap::pixmap_from_image;
use ember_core::{EmberError, FrameRect, Result, TextureId};
use std::collections::HashMap;
use std::path::Path;
use tiny_skia::{IntRect, Pixmap};

/// CPU-side texture, premultiplied
pub struct Texture {
    pub name: String,
    pub pixmap: Pixmap,
}

impl Texture {
    /// Copy of the texels under `frame`, clipped to the sheet.
    ///
    /// Frames are cut out before sampling so bilinear filtering never
    /// bleeds across neighbouring frames.
    pub fn frame(&self, frame: &FrameRect) -> Option<Pixmap> {
        let x = frame.x.round().max(0.0);
        let y = frame.y.round().max(0.0);
        let right = (frame.x + frame.width).round().min(self.pixmap.width() as f32);
        let bottom = (frame.y + frame.height).round().min(self.pixmap.height() as f32);
        if right <= x || bottom <= y {
            return None;
        }
        let rect = IntRect::from_xywh(x as i32, y as i32, (right - x) as u32, (bottom - y) as u32)?;
        self.pixmap.clone_rect(rect)
    }
}

/// Name-keyed texture storage; ids are stable for the cache's lifetime
#[derive(Default)]
pub struct TextureCache {
    textures: Vec<Texture>,
    by_name: HashMap<String, TextureId>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already decoded image. Re-inserting a name returns its existing id.
    pub fn insert_image(&mut self, name: &str, image: &image::RgbaImage) -> Result<TextureId> {
        if let Some(id) = self.by_name.get(name) {
            return Ok(*id);
        }
        let pixmap = pixmap_from_image(image)?;
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(Texture {
            name: name.to_string(),
            pixmap,
        });
        self.by_name.insert(name.to_string(), id);
        log::debug!(
            "[texture] Cached '{}' ({}x{}) as {:?}",
            name,
            image.width(),
            image.height(),
            id
        );
        Ok(id)
    }

    /// Load a texture from an image file on disk
    pub fn load_file(&mut self, name: &str, path: &Path) -> Result<TextureId> {
        if let Some(id) = self.by_name.get(name) {
            return Ok(*id);
        }
        let img = image::open(path).map_err(|e| {
            EmberError::Asset(format!("Failed to open image '{}': {}", path.display(), e))
        })?;
        self.insert_image(name, &img.to_rgba8())
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
