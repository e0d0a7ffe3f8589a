// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render session state: the document, its pages, the user's selection and
//! the generation lifecycle.
//!
//! All mutation goes through named transition methods so the lifecycle
//! invariants hold everywhere: `is_loading` never coexists with a terminal
//! transition, a failed refinement never destroys the last good render, and
//! completions from superseded requests are discarded by token comparison.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::{PageCategory, PageSelection};
use crate::inference::data_uri_mime;
use crate::settings::DesignSettings;

/// Identity of the uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub name: String,
    pub size: u64,
    /// Last-modified timestamp in milliseconds since the epoch, as reported
    /// by the uploader. Zero when unknown.
    pub modified_ms: i64,
    pub mime_type: String,
}

/// One rasterized page of the document. Immutable after ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// 0-based index of the page in the source document.
    pub index: usize,
    /// Encoded bitmap as a `data:` URI.
    pub data_uri: String,
    pub category: PageCategory,
}

/// Derive the starting seed for a document from its identity, so the same
/// upload always starts from the same seed.
pub fn derive_seed(name: &str, size: u64, modified_ms: i64) -> u32 {
    let mut hasher = FxHasher::default();
    name.hash(&mut hasher);
    size.hash(&mut hasher);
    modified_ms.hash(&mut hasher);
    (hasher.finish() & 0x7fff_ffff) as u32
}

/// Derive a fresh seed from the current one. Used by the explicit
/// regenerate-with-new-seed action when the caller supplies no seed.
pub fn reseed(seed: u32, token: u64) -> u32 {
    let mut hasher = FxHasher::default();
    seed.hash(&mut hasher);
    token.hash(&mut hasher);
    (hasher.finish() & 0x7fff_ffff) as u32
}

/// Generation lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderState {
    pub is_loading: bool,
    pub generated_image: Option<String>,
    pub error: Option<String>,
    pub seed: u32,
}

impl RenderState {
    pub fn new(seed: u32) -> Self {
        Self {
            is_loading: false,
            generated_image: None,
            error: None,
            seed,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A generation is already in flight; overlapping requests would race
    /// on the shared render state.
    #[error("a generation is already in progress")]
    GenerationInFlight,

    /// Refinement requested with no render to refine.
    #[error("no render available to refine")]
    NoRenderAvailable,

    #[error("page {index} does not exist (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
}

/// One interactive session: a document, its derived pages, user state and
/// the render lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub document: DocumentMeta,
    pub pages: Vec<Page>,
    pub transcript: Option<String>,
    pub selection: PageSelection,
    pub settings: DesignSettings,
    pub render: RenderState,
    /// Monotonic request token; completions carrying an older token are
    /// stale and must be discarded.
    token: u64,
}

impl Session {
    /// Create a session for a freshly ingested document. The seed comes
    /// from the document identity, the first page starts selected.
    pub fn new(document: DocumentMeta, pages: Vec<Page>, transcript: Option<String>) -> Self {
        let seed = derive_seed(&document.name, document.size, document.modified_ms);
        Self {
            document,
            pages,
            transcript,
            selection: PageSelection::new(),
            settings: DesignSettings::default(),
            render: RenderState::new(seed),
            token: 0,
        }
    }

    /// Ready/Rendered → Generating. Returns the token the eventual
    /// completion must present.
    pub fn begin_generation(&mut self) -> Result<u64, SessionError> {
        if self.render.is_loading {
            return Err(SessionError::GenerationInFlight);
        }
        self.token += 1;
        self.render.is_loading = true;
        self.render.error = None;
        Ok(self.token)
    }

    /// Generating → Rendered. Returns `false` (no state change) when the
    /// token is stale.
    pub fn complete_generation(&mut self, token: u64, image: String) -> bool {
        if token != self.token {
            return false;
        }
        self.render.is_loading = false;
        self.render.generated_image = Some(image);
        self.render.error = None;
        true
    }

    /// Generating → Ready-with-error. A previous successful render, if any,
    /// is preserved untouched. Returns `false` when the token is stale.
    pub fn fail_generation(&mut self, token: u64, message: String) -> bool {
        if token != self.token {
            return false;
        }
        self.render.is_loading = false;
        self.render.error = Some(message);
        true
    }

    /// Rendered → back to selection: clears the render and error, keeps the
    /// document and selection. Bumping the token discards any in-flight
    /// completion.
    pub fn back_to_selection(&mut self) {
        self.token += 1;
        self.render.is_loading = false;
        self.render.generated_image = None;
        self.render.error = None;
    }

    /// Replace the seed ahead of a regeneration.
    pub fn set_seed(&mut self, seed: u32) {
        self.render.seed = seed;
    }

    /// Toggle a page in the selection.
    pub fn toggle_page(&mut self, index: usize) -> Result<bool, SessionError> {
        if index >= self.pages.len() {
            return Err(SessionError::PageOutOfRange {
                index,
                count: self.pages.len(),
            });
        }
        Ok(self.selection.toggle(index))
    }

    /// Data URIs of the selected pages in submission order (master last).
    pub fn selected_images(&self) -> Vec<String> {
        self.selection
            .submission_order()
            .iter()
            .filter_map(|&i| self.pages.get(i))
            .map(|page| page.data_uri.clone())
            .collect()
    }

    /// Mime type shared by the selected pages, read from the first selected
    /// page's data URI. PDF ingestion produces uniform JPEG pages; single
    /// image uploads carry their own type.
    pub fn submission_mime_type(&self) -> String {
        self.selection
            .submission_order()
            .first()
            .and_then(|&i| self.pages.get(i))
            .and_then(|page| data_uri_mime(&page.data_uri))
            .unwrap_or("image/png")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: usize) -> Page {
        Page {
            index,
            data_uri: format!("data:image/jpeg;base64,UEFHRV{index}"),
            category: PageCategory::Other,
        }
    }

    fn session(page_count: usize) -> Session {
        let document = DocumentMeta {
            name: "plan.pdf".to_string(),
            size: 123_456,
            modified_ms: 1_700_000_000_000,
            mime_type: "application/pdf".to_string(),
        };
        Session::new(document, (0..page_count).map(page).collect(), None)
    }

    #[test]
    fn seed_is_deterministic_per_document() {
        let a = derive_seed("plan.pdf", 1000, 42);
        let b = derive_seed("plan.pdf", 1000, 42);
        assert_eq!(a, b);
        assert_ne!(a, derive_seed("plan.pdf", 1000, 43));
        assert_ne!(a, derive_seed("other.pdf", 1000, 42));
    }

    #[test]
    fn same_upload_starts_from_same_seed() {
        assert_eq!(session(3).render.seed, session(3).render.seed);
    }

    #[test]
    fn reseed_is_deterministic_but_different() {
        let seed = derive_seed("plan.pdf", 1000, 42);
        assert_eq!(reseed(seed, 3), reseed(seed, 3));
        assert_ne!(reseed(seed, 3), seed);
    }

    #[test]
    fn overlapping_generations_are_rejected() {
        let mut s = session(2);
        let token = s.begin_generation().unwrap();
        assert_eq!(s.begin_generation(), Err(SessionError::GenerationInFlight));
        assert!(s.complete_generation(token, "data:image/png;base64,AA==".into()));
        assert!(s.begin_generation().is_ok());
    }

    #[test]
    fn seed_survives_refinement_cycles() {
        let mut s = session(2);
        let seed = s.render.seed;
        let token = s.begin_generation().unwrap();
        s.complete_generation(token, "img".into());
        let token = s.begin_generation().unwrap();
        s.complete_generation(token, "img2".into());
        assert_eq!(s.render.seed, seed);
    }

    #[test]
    fn failure_preserves_the_last_good_render() {
        let mut s = session(2);
        let token = s.begin_generation().unwrap();
        assert!(s.complete_generation(token, "good-render".into()));

        let token = s.begin_generation().unwrap();
        assert!(s.fail_generation(token, "model declined".into()));
        assert_eq!(s.render.generated_image.as_deref(), Some("good-render"));
        assert_eq!(s.render.error.as_deref(), Some("model declined"));
        assert!(!s.render.is_loading);
    }

    #[test]
    fn stale_completions_are_discarded() {
        let mut s = session(2);
        let stale = s.begin_generation().unwrap();
        s.back_to_selection();
        let fresh = s.begin_generation().unwrap();

        assert!(!s.complete_generation(stale, "stale-render".into()));
        assert!(s.render.generated_image.is_none());
        assert!(s.render.is_loading);

        assert!(s.complete_generation(fresh, "fresh-render".into()));
        assert_eq!(s.render.generated_image.as_deref(), Some("fresh-render"));
    }

    #[test]
    fn back_to_selection_keeps_document_and_selection() {
        let mut s = session(3);
        s.toggle_page(2).unwrap();
        let token = s.begin_generation().unwrap();
        s.complete_generation(token, "img".into());

        s.back_to_selection();
        assert!(s.render.generated_image.is_none());
        assert!(s.render.error.is_none());
        assert_eq!(s.pages.len(), 3);
        assert_eq!(s.selection.submission_order(), &[0, 2]);
    }

    #[test]
    fn selected_images_follow_click_order_master_last() {
        let mut s = session(4);
        s.toggle_page(3).unwrap();
        s.toggle_page(1).unwrap();
        let images = s.selected_images();
        assert_eq!(images.len(), 3);
        assert!(images[2].contains("UEFHRV1"));
        assert_eq!(s.submission_mime_type(), "image/jpeg");
    }

    #[test]
    fn toggling_an_unknown_page_is_an_error() {
        let mut s = session(2);
        assert!(matches!(
            s.toggle_page(7),
            Err(SessionError::PageOutOfRange { index: 7, count: 2 })
        ));
    }
}
