// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use serde::Serialize;
use showroom_core::{DesignSettings, PageCategory, Session};
use uuid::Uuid;

/// Snapshot of one session, returned by upload and state endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub document: DocumentInfo,
    pub pages: Vec<PageInfo>,
    pub settings: DesignSettings,
    pub render: RenderInfo,
}

/// Identity of the uploaded document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub page_count: usize,
}

/// One selectable page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Position in the page list; the index used by the toggle endpoint.
    pub position: usize,
    /// 1-based page number in the source document.
    pub page_number: usize,
    pub category: PageCategory,
    pub selected: bool,
    /// Encoded page preview as a data URI.
    pub preview: String,
}

/// Render lifecycle summary. The image itself is fetched via the download
/// endpoint or returned by a generation call; snapshots stay small-ish.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInfo {
    pub is_loading: bool,
    pub has_render: bool,
    pub error: Option<String>,
    pub seed: u32,
}

/// Result of a successful generation call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub session_id: Uuid,
    pub seed: u32,
    /// The rendered image as a data URI.
    pub image: String,
}

impl SessionSnapshot {
    pub fn from_session(session_id: Uuid, session: &Session) -> Self {
        Self {
            session_id,
            document: DocumentInfo {
                name: session.document.name.clone(),
                size: session.document.size,
                mime_type: session.document.mime_type.clone(),
                page_count: session.pages.len(),
            },
            pages: session
                .pages
                .iter()
                .enumerate()
                .map(|(position, page)| PageInfo {
                    position,
                    page_number: page.index + 1,
                    category: page.category,
                    selected: session.selection.is_selected(position),
                    preview: page.data_uri.clone(),
                })
                .collect(),
            settings: session.settings,
            render: RenderInfo {
                is_loading: session.render.is_loading,
                has_render: session.render.generated_image.is_some(),
                error: session.render.error.clone(),
                seed: session.render.seed,
            },
        }
    }
}
