//! Texture images and the asynchronous loading contract
//!
//! Loading is abstracted behind [`TextureLoader`] so the browser can fetch
//! over the network while tests serve images from memory. A failed load is
//! never fatal: the face falls back to its flat color.

use std::borrow::Cow;
use std::future::Future;

use tracing::{debug, warn};

use crate::face::FaceSet;

/// Errors that can occur while loading a texture
#[derive(Debug, Clone, thiserror::Error)]
pub enum TextureError {
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Image has zero size")]
    Empty,

    #[error("Pixel buffer of {len} bytes does not match {width}x{height}")]
    SizeMismatch { width: u32, height: u32, len: usize },
}

/// Decoded RGBA8 image in sRGB
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Decode a PNG, JPEG or WebP file
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, TextureError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| TextureError::Decode(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Single-color image
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            pixels: rgba.repeat((width * height) as usize),
        }
    }

    /// Bytes per row of pixels
    pub fn row_bytes(&self) -> u32 {
        self.width * 4
    }

    /// Scale down so neither side exceeds `max_dimension`, keeping the
    /// aspect ratio; images that already fit are borrowed as they are
    pub fn fit_within(&self, max_dimension: u32) -> Result<Cow<'_, Self>, TextureError> {
        let max_dimension = max_dimension.max(1);
        let longest = self.width.max(self.height);
        if longest <= max_dimension {
            return Ok(Cow::Borrowed(self));
        }

        let scale = max_dimension as f64 / longest as f64;
        let fit = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_dimension);
        let (width, height) = (fit(self.width), fit(self.height));

        let source = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
            self.width,
            self.height,
            &self.pixels,
        )
        .ok_or(TextureError::SizeMismatch {
            width: self.width,
            height: self.height,
            len: self.pixels.len(),
        })?;
        let resized =
            image::imageops::resize(&source, width, height, image::imageops::FilterType::Triangle);
        debug!(
            from_width = self.width,
            from_height = self.height,
            width,
            height,
            "Texture scaled to fit device limits"
        );
        Ok(Cow::Owned(Self {
            width,
            height,
            pixels: resized.into_raw(),
        }))
    }
}

/// Source of texture images
pub trait TextureLoader {
    /// Load and decode the image at `url`
    fn load(&self, url: &str) -> impl Future<Output = Result<TextureImage, TextureError>>;
}

/// Load every face group's texture concurrently
///
/// Absent URLs resolve to `None` without touching the loader; failed loads
/// are logged and also resolve to `None`.
pub async fn load_face_textures<L: TextureLoader>(
    loader: &L,
    urls: &FaceSet<Option<String>>,
) -> FaceSet<Option<TextureImage>> {
    let (front, side, top) = futures::future::join3(
        load_one(loader, urls.front.as_deref()),
        load_one(loader, urls.side.as_deref()),
        load_one(loader, urls.top.as_deref()),
    )
    .await;
    FaceSet::new(front, side, top)
}

async fn load_one<L: TextureLoader>(loader: &L, url: Option<&str>) -> Option<TextureImage> {
    let url = url?;
    match loader.load(url).await {
        Ok(image) => Some(image),
        Err(e) => {
            warn!(url, error = %e, "Texture failed to load, using fallback color");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    /// In-memory loader that records requested URLs
    #[derive(Default)]
    pub struct FakeLoader {
        pub images: HashMap<String, TextureImage>,
        pub requested: RefCell<Vec<String>>,
    }

    impl FakeLoader {
        pub fn with(urls: &[&str]) -> Self {
            let images = urls
                .iter()
                .map(|url| (url.to_string(), TextureImage::solid(4, 4, [10, 20, 30, 255])))
                .collect();
            Self {
                images,
                requested: RefCell::default(),
            }
        }
    }

    impl TextureLoader for FakeLoader {
        fn load(&self, url: &str) -> impl Future<Output = Result<TextureImage, TextureError>> {
            self.requested.borrow_mut().push(url.to_string());
            let result = self.images.get(url).cloned().ok_or(TextureError::Status {
                url: url.to_string(),
                status: 404,
            });
            async move { result }
        }
    }
}
