//! Texture loading over `fetch`

use std::future::Future;

use mockup_core::{TextureError, TextureImage, TextureLoader};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::error::js_message;

/// Fetches and decodes texture images in the browser
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTextureLoader;

impl TextureLoader for FetchTextureLoader {
    fn load(&self, url: &str) -> impl Future<Output = Result<TextureImage, TextureError>> {
        let url = url.to_string();
        async move {
            let bytes = fetch_bytes(&url).await?;
            let image = TextureImage::from_encoded(&bytes)?;
            tracing::debug!(%url, width = image.width, height = image.height, "Texture loaded");
            Ok(image)
        }
    }
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, TextureError> {
    let fetch_error = |message: String| TextureError::Fetch {
        url: url.to_string(),
        message,
    };

    let window = web_sys::window().ok_or_else(|| fetch_error("No window".into()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fetch_error(js_message(&e)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|e| fetch_error(js_message(&e)))?;

    if !response.ok() {
        return Err(TextureError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let buffer = response
        .array_buffer()
        .map_err(|e| fetch_error(js_message(&e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| fetch_error(js_message(&e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
