//! Image loader that decodes data URLs and files with the `image` crate.

use boothkit_core::images::{BoxFuture, Bitmap, ImageError, ImageLoader, ImageResult, ImageSource};
use std::path::{Path, PathBuf};

/// Decodes PNG, JPEG and WebP images. Relative paths resolve against `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct DecodingImageLoader {
    base_dir: PathBuf,
}

impl DecodingImageLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn load_sync(&self, source: &str) -> ImageResult<Bitmap> {
        let bytes = match ImageSource::parse(source)? {
            ImageSource::Data { bytes, .. } => bytes,
            ImageSource::Path(path) => {
                let path = if path.is_absolute() {
                    path
                } else {
                    self.base_dir.join(path)
                };
                std::fs::read(&path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => ImageError::NotFound(path.display().to_string()),
                    _ => ImageError::Io(format!("{}: {e}", path.display())),
                })?
            }
            ImageSource::Remote(url) => {
                return Err(ImageError::UnsupportedSource(format!("remote images are not fetched: {url}")));
            }
        };
        decode(&bytes)
    }
}

/// Decode encoded image bytes into an RGBA bitmap.
pub fn decode(bytes: &[u8]) -> ImageResult<Bitmap> {
    let img = image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Bitmap::new(width, height, rgba.into_raw())
}

impl ImageLoader for DecodingImageLoader {
    fn load(&self, source: &str) -> BoxFuture<'_, ImageResult<Bitmap>> {
        let result = self.load_sync(source);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boothkit_core::images::ImageCache;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png_bytes() -> Vec<u8> {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(2, 1, Rgba([0, 0, 255, 128]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_load_relative_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("frame.png"), png_bytes()).unwrap();
        let loader = DecodingImageLoader::new(dir.path());

        let bitmap = pollster::block_on(loader.load("frame.png")).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
        assert_eq!(&bitmap.pixels()[..4], &[255, 0, 0, 255]);
        assert_eq!(&bitmap.pixels()[20..24], &[0, 0, 255, 128]);
    }

    #[test]
    fn test_load_data_url() {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes());
        let loader = DecodingImageLoader::default();
        let mut cache = ImageCache::new();
        let source = format!("data:image/png;base64,{encoded}");
        let bitmap = pollster::block_on(cache.fetch(&loader, &source)).unwrap();
        assert_eq!(bitmap.width(), 3);
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not an image").unwrap();
        let loader = DecodingImageLoader::new(dir.path());

        assert!(matches!(
            pollster::block_on(loader.load("missing.png")),
            Err(ImageError::NotFound(_))
        ));
        assert!(matches!(
            pollster::block_on(loader.load("broken.png")),
            Err(ImageError::Decode(_))
        ));
        assert!(matches!(
            pollster::block_on(loader.load("https://example.com/a.png")),
            Err(ImageError::UnsupportedSource(_))
        ));
    }
}
