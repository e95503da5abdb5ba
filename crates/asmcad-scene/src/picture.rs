//! Shared image handles
//!
//! Pictures are loaded once per file name and shared by every node that shows
//! them: all cube icons hold the same [`ImageHandle`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

use crate::error::{Error, Result};

/// A decoded picture
#[derive(Debug)]
pub struct Picture {
    pub name: String,
    pub pixels: RgbaImage,
}

impl Picture {
    pub fn new(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            name: name.into(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Reference-counted picture; lives as long as its last holder
pub type ImageHandle = Arc<Picture>;

/// Where pictures come from
pub trait ImageSource {
    fn load(&self, name: &str) -> Result<Picture>;
}

/// Loads PNG files relative to an asset directory
#[derive(Debug, Clone)]
pub struct FileImageSource {
    root: PathBuf,
}

impl FileImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageSource for FileImageSource {
    fn load(&self, name: &str) -> Result<Picture> {
        let path = self.root.join(name);
        if !path.exists() {
            return Err(Error::AssetNotFound(path.display().to_string()));
        }
        let pixels = image::open(&path)?.to_rgba8();
        Ok(Picture::new(name, pixels))
    }
}

/// Lazily populated cache keyed by file name
///
/// A name that failed to load is remembered as missing and yields `None`
/// from then on; drawing code skips nodes without a picture.
pub struct ImageCache {
    source: Box<dyn ImageSource>,
    entries: HashMap<String, Option<ImageHandle>>,
}

impl ImageCache {
    pub fn new(source: impl ImageSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            entries: HashMap::new(),
        }
    }

    /// Get the picture for `name`, loading it on first request
    pub fn get(&mut self, name: &str) -> Option<ImageHandle> {
        if let Some(entry) = self.entries.get(name) {
            return entry.clone();
        }

        let entry = match self.source.load(name) {
            Ok(picture) => {
                tracing::debug!("Loaded image {} ({}x{})", name, picture.width(), picture.height());
                Some(Arc::new(picture))
            }
            Err(e) => {
                tracing::warn!("Image {} unavailable: {}", name, e);
                None
            }
        };
        self.entries.insert(name.to_string(), entry.clone());
        entry
    }

    /// Number of names requested so far (loaded or missing)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingSource {
        loads: Rc<Cell<usize>>,
    }

    impl ImageSource for CountingSource {
        fn load(&self, name: &str) -> Result<Picture> {
            self.loads.set(self.loads.get() + 1);
            if name.starts_with("missing") {
                return Err(Error::AssetNotFound(name.to_string()));
            }
            Ok(Picture::new(name, RgbaImage::new(4, 2)))
        }
    }

    #[test]
    fn test_cache_shares_handles() {
        let loads = Rc::new(Cell::new(0));
        let mut cache = ImageCache::new(CountingSource {
            loads: loads.clone(),
        });

        let a = cache.get("img/cube.png");
        let b = cache.get("img/cube.png");
        let (Some(a), Some(b)) = (a, b) else {
            panic!("cube image should load");
        };
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.width(), 4);
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn test_missing_image_is_remembered() {
        let loads = Rc::new(Cell::new(0));
        let mut cache = ImageCache::new(CountingSource {
            loads: loads.clone(),
        });

        assert!(cache.get("missing.png").is_none());
        assert!(cache.get("missing.png").is_none());
        assert_eq!(loads.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_file_source_reports_missing_file() {
        let source = FileImageSource::new(std::env::temp_dir().join("asmcad_no_such_dir"));
        let result = source.load("img/cube.png");
        assert!(matches!(result, Err(Error::AssetNotFound(_))));
    }
}
