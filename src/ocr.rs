//! Turning image documents into text.
//!
//! Some schools upload their plans as JPEGs. The recognition itself lives
//! outside this crate; plug an engine in through [`ImageTextExtractor`].

use crate::api::client::FetchedDocument;
use crate::error::{DsbError, Result};
use async_trait::async_trait;

#[async_trait]
pub trait ImageTextExtractor: Send + Sync {
    /// Recognize the text on an image.
    async fn extract_text(&self, image: &[u8]) -> Result<String>;

    /// Whether images are worth downloading at all.
    fn is_available(&self) -> bool {
        true
    }
}

/// Used when no OCR engine is configured. Images are not downloaded, and
/// every image handed to it anyway fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOcr;

#[async_trait]
impl ImageTextExtractor for NoOcr {
    async fn extract_text(&self, _image: &[u8]) -> Result<String> {
        Err(DsbError::Ocr("No OCR engine configured".to_string()))
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Check the content type, then hand the bytes to the extractor.
pub async fn recognize(document: &FetchedDocument, extractor: &dyn ImageTextExtractor) -> Result<String> {
    let content_type = document.content_type.as_deref().unwrap_or("");
    if !content_type.starts_with("image") {
        return Err(DsbError::InvalidImageResponse {
            content_type: content_type.to_string(),
        });
    }

    extractor.extract_text(&document.body).await
}
