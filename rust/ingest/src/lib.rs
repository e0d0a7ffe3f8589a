// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document ingestion: turn an uploaded floor-plan file into an ordered
//! set of encoded page images plus an optional text transcript.
//!
//! Two input shapes are supported:
//!
//! - A single raster image is passed through untouched as one page.
//! - A PDF is rasterized page by page via pdfium, classified by extracted
//!   text, and encoded as JPEG (quality ~0.8) to bound the payload sent to
//!   the inference service.
//!
//! Ingestion is all-or-nothing: any failure leaves no partial pages behind.
//! pdfium is not async-safe, so callers on an async runtime must run
//! [`ingest`] inside `spawn_blocking`; pages are processed strictly
//! sequentially on the same document handle.

mod encode;
mod pdf;

pub use encode::{data_uri, encode_jpeg_data_uri};

use showroom_core::{DocumentMeta, Page, PageCategory};
use thiserror::Error;

/// Media type of PDF documents; everything else accepted is `image/*`.
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum IngestError {
    /// Rasterization or text extraction failed on the uploaded document.
    #[error("failed to read document: {0}")]
    DocumentRead(String),

    /// The uploaded media type is neither a raster image nor a PDF.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// A rendered page could not be encoded.
    #[error("failed to encode page image: {0}")]
    PageEncode(String),
}

/// Ingestion tuning knobs.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Maximum number of pages kept from one document.
    pub page_cap: usize,
    /// How many pages are scanned for classification keywords.
    pub scan_limit: usize,
    /// Rasterization scale factor.
    pub render_scale: f32,
    /// JPEG quality for rasterized pages (0-100).
    pub jpeg_quality: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            page_cap: 12,
            scan_limit: 30,
            render_scale: 1.5,
            jpeg_quality: 80,
        }
    }
}

/// Result of one ingestion.
#[derive(Debug, Clone)]
pub struct Ingested {
    /// Kept pages, in classifier rank order (perspectives first).
    pub pages: Vec<Page>,
    /// Concatenated per-page text with `[PAGE n]:` markers; PDFs only.
    pub transcript: Option<String>,
}

/// Ingest an uploaded document.
pub fn ingest(
    bytes: &[u8],
    meta: &DocumentMeta,
    options: &IngestOptions,
) -> Result<Ingested, IngestError> {
    if meta.mime_type == PDF_MIME {
        return pdf::ingest_pdf(bytes, options);
    }

    if meta.mime_type.starts_with("image/") {
        tracing::debug!(name = %meta.name, mime = %meta.mime_type, "ingesting single raster image");
        return Ok(Ingested {
            pages: vec![Page {
                index: 0,
                data_uri: data_uri(&meta.mime_type, bytes),
                category: PageCategory::Other,
            }],
            transcript: None,
        });
    }

    Err(IngestError::UnsupportedMediaType(meta.mime_type.clone()))
}

/// Wrap one page's extracted text with its page marker (1-based).
pub(crate) fn page_marker(page_number: usize, text: &str) -> String {
    format!("[PAGE {page_number}]: {text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(mime: &str) -> DocumentMeta {
        DocumentMeta {
            name: "plan.png".to_string(),
            size: 4,
            modified_ms: 0,
            mime_type: mime.to_string(),
        }
    }

    #[test]
    fn single_image_becomes_exactly_one_page() {
        let ingested = ingest(b"\x89PNG", &meta("image/png"), &IngestOptions::default()).unwrap();
        assert_eq!(ingested.pages.len(), 1);
        assert_eq!(ingested.pages[0].index, 0);
        assert!(ingested.pages[0].data_uri.starts_with("data:image/png;base64,"));
        // No PDF parsing, no transcript, classification skipped.
        assert!(ingested.transcript.is_none());
        assert_eq!(ingested.pages[0].category, PageCategory::Other);
    }

    #[test]
    fn unknown_media_types_are_rejected() {
        let err = ingest(b"PK", &meta("application/zip"), &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedMediaType(_)));
    }

    #[test]
    fn page_markers_are_one_based() {
        assert_eq!(page_marker(3, "B30 SB36"), "[PAGE 3]: B30 SB36");
    }
}
