use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, ImageReader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("read overlay image '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decode overlay image '{path}'")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A decoded raster image, re-encoded as PNG for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl OverlayImage {
    pub fn decode(path: &Path) -> Result<Self, OverlayError> {
        let decode_err = |source| OverlayError::Decode {
            path: path.to_path_buf(),
            source,
        };
        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|source| OverlayError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let decoded = reader.decode().map_err(decode_err)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut png = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(decode_err)?;

        Ok(Self { width, height, png })
    }

    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Outcome of resolving the configured overlay.
#[derive(Debug)]
pub enum Overlay {
    Loaded(OverlayImage),
    NotConfigured,
    Unavailable(OverlayError),
}

impl Overlay {
    /// Never fails: a missing or undecodable file becomes
    /// [`Overlay::Unavailable`] and the overlay step is skipped.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Overlay::NotConfigured;
        };
        match OverlayImage::decode(path) {
            Ok(image) => {
                tracing::debug!(
                    path = %path.display(),
                    width = image.width,
                    height = image.height,
                    "loaded overlay image"
                );
                Overlay::Loaded(image)
            }
            Err(err) => {
                tracing::warn!(error = %err, cause = ?std::error::Error::source(&err), "overlay image unavailable, skipping");
                Overlay::Unavailable(err)
            }
        }
    }

    pub fn image(&self) -> Option<&OverlayImage> {
        match self {
            Overlay::Loaded(image) => Some(image),
            Overlay::NotConfigured | Overlay::Unavailable(_) => None,
        }
    }
}

#[cfg(test)]
pub(crate) fn write_test_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 4) as u8, (y * 4) as u8, 0xC0, 0xFF])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sector-wheel-{}-{}", std::process::id(), name))
    }

    #[test]
    fn loads_png_with_pixel_dimensions() {
        let path = temp_path("overlay-64.png");
        write_test_png(&path, 64, 32);
        let overlay = Overlay::load(Some(&path));
        std::fs::remove_file(&path).ok();

        let image = overlay.image().expect("overlay should load");
        assert_eq!((image.width, image.height), (64, 32));
        assert!(image.png.starts_with(&[0x89, b'P', b'N', b'G']));
        assert!(image.data_uri().starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn missing_path_is_unavailable() {
        let overlay = Overlay::load(Some(&temp_path("does-not-exist.png")));
        assert!(matches!(overlay, Overlay::Unavailable(OverlayError::Io { .. })));
        assert!(overlay.image().is_none());
    }

    #[test]
    fn garbage_file_is_unavailable() {
        let path = temp_path("garbage.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        let overlay = Overlay::load(Some(&path));
        std::fs::remove_file(&path).ok();
        assert!(matches!(overlay, Overlay::Unavailable(OverlayError::Decode { .. })));
    }

    #[test]
    fn no_path_is_not_configured() {
        assert!(matches!(Overlay::load(None), Overlay::NotConfigured));
    }
}
