//! Image provider interface and the per-source image cache.
//!
//! Shapes refer to images by an opaque source string. Loading is the only
//! asynchronous step in the editor: a shape draws its placeholder until the
//! cache holds a decoded [`Bitmap`] for its source, and a failed load simply
//! leaves the placeholder in place.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Image loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("Image not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),
}

/// Result type for image operations.
pub type ImageResult<T> = Result<T, ImageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Decoded RGBA8 pixels. Cloning shares the pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl Bitmap {
    /// Wrap RGBA8 pixel data, checking the buffer length.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> ImageResult<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ImageError::Decode(format!(
                "expected {expected} bytes for {width}x{height} RGBA, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: Arc::from(pixels),
        })
    }

    /// A bitmap filled with one RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels: Vec<u8> = std::iter::repeat_n(rgba, width as usize * height as usize)
            .flatten()
            .collect();
        Self {
            width,
            height,
            pixels: Arc::from(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Where an image source string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Embedded `data:` URL, already base64-decoded.
    Data { mime: String, bytes: Vec<u8> },
    /// `http(s)://` URL.
    Remote(String),
    /// Filesystem path, possibly relative to an asset root.
    Path(PathBuf),
}

impl ImageSource {
    /// Classify a source string.
    pub fn parse(source: &str) -> ImageResult<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(ImageError::UnsupportedSource("empty source".to_string()));
        }
        if let Some(rest) = source.strip_prefix("data:") {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| ImageError::Decode("data URL without payload".to_string()))?;
            let Some(mime) = header.strip_suffix(";base64") else {
                return Err(ImageError::UnsupportedSource(
                    "data URL is not base64-encoded".to_string(),
                ));
            };
            let bytes = BASE64
                .decode(payload.trim())
                .map_err(|e| ImageError::Decode(format!("Invalid base64: {e}")))?;
            return Ok(ImageSource::Data {
                mime: mime.to_string(),
                bytes,
            });
        }
        if source.starts_with("http://") || source.starts_with("https://") {
            return Ok(ImageSource::Remote(source.to_string()));
        }
        Ok(ImageSource::Path(PathBuf::from(source)))
    }
}

/// Maps an image source to decoded pixels.
pub trait ImageLoader: Send + Sync {
    /// Load and decode the image at `source`.
    fn load(&self, source: &str) -> BoxFuture<'_, ImageResult<Bitmap>>;
}

/// In-memory loader for testing and pre-decoded assets.
#[derive(Default)]
pub struct MemoryImageLoader {
    images: RwLock<HashMap<String, Bitmap>>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bitmap under `source`.
    pub fn insert(&self, source: impl Into<String>, bitmap: Bitmap) {
        if let Ok(mut images) = self.images.write() {
            images.insert(source.into(), bitmap);
        }
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&self, source: &str) -> BoxFuture<'_, ImageResult<Bitmap>> {
        let source = source.to_string();
        Box::pin(async move {
            let images = self
                .images
                .read()
                .map_err(|e| ImageError::Io(format!("Lock error: {e}")))?;
            images.get(&source).cloned().ok_or(ImageError::NotFound(source))
        })
    }
}

/// Load state of one source.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageStatus {
    Loading,
    Loaded(Bitmap),
    Failed(String),
}

/// Per-source cache of load results.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, ImageStatus>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `source` as wanted. Returns `true` if a load should be started.
    pub fn request(&mut self, source: &str) -> bool {
        if self.entries.contains_key(source) {
            return false;
        }
        self.entries.insert(source.to_string(), ImageStatus::Loading);
        true
    }

    /// Record the outcome of a load.
    pub fn resolve(&mut self, source: &str, result: ImageResult<Bitmap>) {
        let status = match result {
            Ok(bitmap) => {
                log::debug!("loaded image {source} ({}x{})", bitmap.width(), bitmap.height());
                ImageStatus::Loaded(bitmap)
            }
            Err(e) => {
                log::warn!("failed to load image {source}: {e}");
                ImageStatus::Failed(e.to_string())
            }
        };
        self.entries.insert(source.to_string(), status);
    }

    /// Request `source` and, if it was not known yet, load it with `loader`.
    pub async fn fetch(&mut self, loader: &dyn ImageLoader, source: &str) -> Option<&Bitmap> {
        if self.request(source) {
            let result = loader.load(source).await;
            self.resolve(source, result);
        }
        self.bitmap(source)
    }

    /// Load every source still marked as loading.
    pub async fn load_pending(&mut self, loader: &dyn ImageLoader) {
        for source in self.pending() {
            let result = loader.load(&source).await;
            self.resolve(&source, result);
        }
    }

    pub fn status(&self, source: &str) -> Option<&ImageStatus> {
        self.entries.get(source)
    }

    /// The decoded bitmap, if loading succeeded.
    pub fn bitmap(&self, source: &str) -> Option<&Bitmap> {
        match self.entries.get(source) {
            Some(ImageStatus::Loaded(bitmap)) => Some(bitmap),
            _ => None,
        }
    }

    /// Sources whose load has not finished.
    pub fn pending(&self) -> Vec<String> {
        let mut pending: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, status)| matches!(status, ImageStatus::Loading))
            .map(|(source, _)| source.clone())
            .collect();
        pending.sort();
        pending
    }

    /// Drop entries for sources no longer referenced.
    pub fn retain_sources(&mut self, live: &HashSet<&str>) {
        self.entries.retain(|source, _| live.contains(source.as_str()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
