// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PDF ingestion via pdfium.
//!
//! Runs entirely on the calling thread: pdfium does not support concurrent
//! access to one document handle, so text extraction and rendering proceed
//! page by page.

use pdfium_render::prelude::*;
use showroom_core::{classify_page, rank_pages, Page};

use crate::encode::encode_jpeg_data_uri;
use crate::{page_marker, IngestError, Ingested, IngestOptions};

impl From<PdfiumError> for IngestError {
    fn from(err: PdfiumError) -> Self {
        IngestError::DocumentRead(err.to_string())
    }
}

/// Rasterize, classify and encode the pages of a PDF document.
pub fn ingest_pdf(bytes: &[u8], options: &IngestOptions) -> Result<Ingested, IngestError> {
    let bindings = Pdfium::bind_to_system_library()
        .map_err(|e| IngestError::DocumentRead(format!("pdfium unavailable: {e}")))?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium.load_pdf_from_byte_slice(bytes, None)?;
    let page_count = document.pages().len() as usize;
    tracing::debug!(page_count, "opened PDF document");

    // Pass 1: extract text from every page. The transcript covers the whole
    // document; classification only looks at the scanned prefix.
    let mut texts = Vec::with_capacity(page_count);
    for (number, page) in document.pages().iter().enumerate() {
        let text = page.text().map(|t| t.all()).unwrap_or_default();
        texts.push(page_marker(number + 1, &text));
    }
    let transcript = texts.join("\n");

    let ranked = rank_pages(&texts, options.scan_limit, options.page_cap);
    tracing::debug!(kept = ranked.len(), order = ?ranked, "classified page order");

    // Pass 2: render only the kept pages, in rank order.
    let render_config = PdfRenderConfig::new().scale_page_by_factor(options.render_scale);
    let mut pages = Vec::with_capacity(ranked.len());
    for index in ranked {
        let page = document.pages().get(index as u16)?;
        let bitmap = page.render_with_config(&render_config)?;
        let data_uri = encode_jpeg_data_uri(&bitmap.as_image(), options.jpeg_quality)?;
        pages.push(Page {
            index,
            data_uri,
            category: classify_page(&texts[index]),
        });
    }

    if pages.is_empty() {
        return Err(IngestError::DocumentRead(
            "document produced no renderable pages".to_string(),
        ));
    }

    Ok(Ingested {
        pages,
        transcript: Some(transcript),
    })
}
