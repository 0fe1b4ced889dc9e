//! Asset preload queue and texture registry.
//!
//! Textures are only needed for their dimensions (body sizes and sprite
//! frames). A file that is missing or unreadable never fails the load: the
//! key is registered with its built-in size and flagged as missing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::entities::{DUDE_FRAME_HEIGHT, DUDE_FRAME_WIDTH, TEX_BOMB, TEX_DUDE, TEX_GROUND, TEX_SKY, TEX_STAR};

/// Size used for keys without a built-in size.
pub const MISSING_SIZE: (u32, u32) = (32, 32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    SpriteSheet { frame_width: u32, frame_height: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetEntry {
    pub key: String,
    pub path: PathBuf,
    pub kind: AssetKind,
}

/// Collects asset requests during a scene's preload hook.
#[derive(Clone, Debug, Default)]
pub struct Loader {
    queue: Vec<AssetEntry>,
}

impl Loader {
    pub fn image(&mut self, key: &str, path: impl Into<PathBuf>) {
        self.queue.push(AssetEntry {
            key: key.to_string(),
            path: path.into(),
            kind: AssetKind::Image,
        });
    }

    pub fn spritesheet(&mut self, key: &str, path: impl Into<PathBuf>, frame_width: u32, frame_height: u32) {
        self.queue.push(AssetEntry {
            key: key.to_string(),
            path: path.into(),
            kind: AssetKind::SpriteSheet { frame_width, frame_height },
        });
    }

    pub fn entries(&self) -> &[AssetEntry] {
        &self.queue
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub key: String,
    pub width: u32,
    pub height: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    /// The source file could not be read.
    pub missing: bool,
}

impl Texture {
    pub fn frame_count(&self) -> u32 {
        (self.width / self.frame_width.max(1)).max(1) * (self.height / self.frame_height.max(1)).max(1)
    }
}

#[derive(Clone, Debug, Default)]
pub struct TextureManager {
    textures: HashMap<String, Texture>,
}

impl TextureManager {
    /// Resolve every queued entry against `base` and register it.
    pub fn load(&mut self, loader: &Loader, base: &Path) {
        for entry in loader.entries() {
            let path = base.join(&entry.path);
            let (size, missing) = match image::image_dimensions(&path) {
                Ok(size) => (size, false),
                Err(err) => {
                    log::warn!("Failed to load '{}' from {}: {err}", entry.key, path.display());
                    (builtin_size(&entry.key), true)
                }
            };
            let texture = make_texture(&entry.key, size, &entry.kind, missing);
            log::debug!("Texture '{}' {}x{} (missing: {})", texture.key, texture.width, texture.height, missing);
            self.textures.insert(entry.key.clone(), texture);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Texture> {
        self.textures.get(key)
    }

    /// Size of one frame of `key`; unknown keys get [`MISSING_SIZE`].
    pub fn frame_size(&self, key: &str) -> (f32, f32) {
        match self.textures.get(key) {
            Some(t) => (t.frame_width as f32, t.frame_height as f32),
            None => (MISSING_SIZE.0 as f32, MISSING_SIZE.1 as f32),
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn make_texture(key: &str, (width, height): (u32, u32), kind: &AssetKind, missing: bool) -> Texture {
    let (frame_width, frame_height) = match kind {
        AssetKind::Image => (width, height),
        AssetKind::SpriteSheet { frame_width, frame_height } => (*frame_width, *frame_height),
    };
    Texture {
        key: key.to_string(),
        width,
        height,
        frame_width,
        frame_height,
        missing,
    }
}

/// Stock sizes of the game's own art, used when a file is unavailable.
pub fn builtin_size(key: &str) -> (u32, u32) {
    match key {
        TEX_SKY => (720, 1280),
        TEX_GROUND => (400, 32),
        TEX_STAR => (24, 22),
        TEX_BOMB => (14, 14),
        TEX_DUDE => (DUDE_FRAME_WIDTH * 9, DUDE_FRAME_HEIGHT),
        _ => MISSING_SIZE,
    }
}
