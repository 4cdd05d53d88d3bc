//! Path-keyed cache of decoded textures
//!
//! A cache is owned by the caller and lent to a [`crate::ModelLoader`], so its
//! lifetime and invalidation stay under the caller's control.

use crate::error::ImageError;
use crate::raw_image::RawImage;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Decodes each texture path at most once
#[derive(Debug, Default)]
pub struct TextureCache {
    textures: HashMap<PathBuf, Arc<RawImage>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A previously loaded texture.
    pub fn get(&self, path: &Path) -> Option<Arc<RawImage>> {
        self.textures.get(path).cloned()
    }

    /// Return the cached texture for `path`, decoding it on first use.
    ///
    /// Failed decodes are not cached.
    pub fn load(&mut self, path: &Path) -> Result<Arc<RawImage>, ImageError> {
        if let Some(image) = self.textures.get(path) {
            return Ok(Arc::clone(image));
        }
        debug!("Loading texture {}", path.display());
        let image = Arc::new(RawImage::open(path)?);
        self.textures.insert(path.to_path_buf(), Arc::clone(&image));
        Ok(image)
    }

    /// Insert an already decoded texture, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<PathBuf>, image: RawImage) -> Arc<RawImage> {
        let image = Arc::new(image);
        self.textures.insert(path.into(), Arc::clone(&image));
        image
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.textures.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.textures.keys().map(PathBuf::as_path)
    }
}
