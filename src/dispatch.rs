//! Route document references to the right parser.

use crate::api::client::Transport;
use crate::error::Result;
use crate::ocr::{self, ImageTextExtractor};
use crate::timetable::{parse_timetable, ColumnMapping, LessonRecord};
use log::{debug, info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Table,
    Image,
    Ignored,
}

/// Classify a document URL by its suffix.
///
/// `.htm` pages are tables, except `.html` and the `news.htm` ticker.
/// `.jpg` files are images when image processing is enabled.
pub fn classify(url: &str, images: bool) -> DocumentKind {
    if url.ends_with(".htm") && !url.ends_with(".html") && !url.ends_with("news.htm") {
        DocumentKind::Table
    } else if url.ends_with(".jpg") && images {
        DocumentKind::Image
    } else {
        DocumentKind::Ignored
    }
}

/// What one document turned into.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Timetable(Vec<LessonRecord>),
    ImageText(String),
}

/// The outcome for one dispatched document reference.
#[derive(Debug)]
pub struct DocumentResult {
    pub url: String,
    pub result: Result<Document>,
}

pub struct Dispatcher<'a> {
    pub transport: &'a dyn Transport,
    pub mapping: &'a ColumnMapping,
    pub ocr: &'a dyn ImageTextExtractor,
}

impl Dispatcher<'_> {
    /// Fetch and parse each reference, one after another, in input order.
    ///
    /// Ignored references do not appear in the output. A failing document
    /// only fails its own slot. Images are ignored when the extractor is not
    /// available.
    pub async fn dispatch(&self, refs: &[String], images: bool) -> Vec<DocumentResult> {
        let images = images && self.images_enabled(refs);
        let mut results = Vec::new();

        for url in refs {
            let result = match classify(url, images) {
                DocumentKind::Table => self.fetch_timetable(url).await,
                DocumentKind::Image => self.fetch_image(url).await,
                DocumentKind::Ignored => {
                    debug!("Skipping {}", url);
                    continue;
                }
            };

            if let Err(e) = &result {
                warn!("Failed to process {}: {}", url, e);
            }
            results.push(DocumentResult {
                url: url.clone(),
                result,
            });
        }

        results
    }

    fn images_enabled(&self, refs: &[String]) -> bool {
        if self.ocr.is_available() {
            return true;
        }

        let skipped = refs
            .iter()
            .filter(|url| classify(url, true) == DocumentKind::Image)
            .count();
        if skipped > 0 {
            info!("No OCR engine configured, skipping {} image documents", skipped);
        }
        false
    }

    async fn fetch_timetable(&self, url: &str) -> Result<Document> {
        let page = self.transport.get(url).await?;
        let records = parse_timetable(&page.text(), self.mapping)?;
        debug!("Parsed {} records from {}", records.len(), url);

        Ok(Document::Timetable(records))
    }

    async fn fetch_image(&self, url: &str) -> Result<Document> {
        let image = self.transport.get(url).await?;
        let text = ocr::recognize(&image, self.ocr).await?;

        Ok(Document::ImageText(text))
    }
}
