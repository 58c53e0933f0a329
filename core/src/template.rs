//! Reference images and their cache.

use {
    anyhow::Context as _,
    derive_more::Deref,
    image::{DynamicImage, ImageReader, RgbImage},
    std::{
        collections::HashMap,
        io::BufReader,
        path::{Path, PathBuf},
        sync::Arc,
    },
    tracing::{debug, warn},
};

/// A decoded reference image of a UI element.
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct ReferenceImage {
    path: PathBuf,
    #[deref]
    image: RgbImage,
}

impl ReferenceImage {
    pub fn new(path: impl Into<PathBuf>, image: RgbImage) -> Self {
        Self {
            path: path.into(),
            image,
        }
    }

    /// Path the image was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

/// Source of encoded reference images.
pub trait ImageSource {
    /// Reads and decodes the image at `path`.
    ///
    /// Returns `Ok(None)` if there is no file at `path`.
    fn open(&self, path: &Path) -> anyhow::Result<Option<DynamicImage>>;
}

/// Reads images from the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn open(&self, path: &Path) -> anyhow::Result<Option<DynamicImage>> {
        if !path.try_exists()? {
            return Ok(None);
        }
        let file = fs_err::File::open(path)?;
        let image = ImageReader::new(BufReader::new(file))
            .with_guessed_format()
            .with_context(|| format!("failed to read image {:?}", path))?
            .decode()
            .with_context(|| format!("failed to decode image {:?}", path))?;
        Ok(Some(image))
    }
}

/// Loads reference images and keeps them for the lifetime of the store.
///
/// Each distinct path is read at most once. A path that couldn't be loaded
/// stays unavailable: the failure is cached as well, so the template never
/// matches during the run.
pub struct TemplateStore<S = FsImageSource> {
    source: S,
    cache: HashMap<PathBuf, Option<Arc<ReferenceImage>>>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::with_source(FsImageSource)
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ImageSource> TemplateStore<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the reference image stored at `path`, or `None` if it's unavailable.
    pub fn load(&mut self, path: &Path) -> Option<Arc<ReferenceImage>> {
        if let Some(cached) = self.cache.get(path) {
            return cached.clone();
        }
        let loaded = match self.source.open(path) {
            Ok(Some(image)) => {
                let image = ReferenceImage::new(path, image.into_rgb8());
                debug!(
                    "loaded template {:?} ({}x{})",
                    path,
                    image.width(),
                    image.height()
                );
                Some(Arc::new(image))
            }
            Ok(None) => {
                warn!("template {:?} not found", path);
                None
            }
            Err(err) => {
                warn!("failed to load template {:?}: {:?}", path, err);
                None
            }
        };
        self.cache.insert(path.to_path_buf(), loaded.clone());
        loaded
    }
}
