// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session lifecycle endpoints: upload, state, page selection, settings and
//! reset.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use showroom_core::{DesignSettings, DocumentMeta, Session, SessionError};
use showroom_ingest::IngestOptions;
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::SessionSnapshot;
use crate::AppState;

/// One uploaded document, pulled out of the multipart body.
struct UploadedFile {
    name: String,
    mime_type: String,
    modified_ms: i64,
    bytes: Vec<u8>,
}

/// Extract the uploaded file (and optional `modified_ms` field) from a
/// multipart request.
async fn extract_upload(multipart: &mut Multipart) -> Result<UploadedFile, ApiError> {
    let mut file: Option<UploadedFile> = None;
    let mut modified_ms = 0i64;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "file" => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let declared = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?.to_vec();
                tracing::debug!(name = %name, size = bytes.len(), "extracted file from multipart");
                let mime_type = declared.unwrap_or_else(|| guess_mime(&name).to_string());
                file = Some(UploadedFile {
                    name,
                    mime_type,
                    modified_ms: 0,
                    bytes,
                });
            }
            // Browsers know the file's mtime; it feeds the deterministic
            // starting seed so the same upload resumes at the same seed.
            "modified_ms" => {
                modified_ms = field.text().await?.parse().unwrap_or(0);
            }
            other => {
                tracing::debug!(field_name = %other, "ignoring unknown multipart field");
            }
        }
    }

    let mut file = file.ok_or(ApiError::MissingFile)?;
    file.modified_ms = modified_ms;
    Ok(file)
}

/// Fallback media type from the file extension, for clients that omit a
/// content type on the part.
fn guess_mime(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

/// POST /api/v1/sessions - Upload a document and create a session.
pub async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let upload = extract_upload(&mut multipart).await?;

    if upload.bytes.len() > state.config.max_file_size_mb * 1024 * 1024 {
        return Err(ApiError::FileTooLarge {
            max_mb: state.config.max_file_size_mb,
        });
    }

    let meta = DocumentMeta {
        name: upload.name,
        size: upload.bytes.len() as u64,
        modified_ms: upload.modified_ms,
        mime_type: upload.mime_type,
    };

    let options = IngestOptions {
        page_cap: state.config.page_cap,
        scan_limit: state.config.page_scan_limit,
        render_scale: state.config.render_scale,
        ..IngestOptions::default()
    };

    // pdfium is not async-safe; rasterization runs on the blocking pool,
    // pages strictly sequential.
    let bytes = upload.bytes;
    let ingest_meta = meta.clone();
    let ingested =
        tokio::task::spawn_blocking(move || showroom_ingest::ingest(&bytes, &ingest_meta, &options))
            .await??;

    let session = Session::new(meta, ingested.pages, ingested.transcript);
    let id = state.store.insert(session).await;
    tracing::info!(session_id = %id, "session created");

    let snapshot = state
        .store
        .with_session(&id, |s| SessionSnapshot::from_session(id, s))
        .await?;
    Ok(Json(snapshot))
}

/// GET /api/v1/sessions/:id - Session snapshot.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let snapshot = state
        .store
        .with_session(&id, |s| SessionSnapshot::from_session(id, s))
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/pages/:index/toggle - Toggle a page in the
/// selection. Deselecting the last remaining page is a no-op.
pub async fn toggle_page(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state
        .store
        .with_session_mut(&id, |s| s.toggle_page(index))
        .await??;

    let snapshot = state
        .store
        .with_session(&id, |s| SessionSnapshot::from_session(id, s))
        .await?;
    Ok(Json(snapshot))
}

/// PUT /api/v1/sessions/:id/settings - Replace the design settings.
///
/// Settings are a full value object; partial updates are expressed by
/// sending the whole thing. Rejected while a generation is in flight, since
/// the triggering controls are supposed to be disabled.
pub async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(settings): Json<DesignSettings>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state
        .store
        .with_session_mut(&id, |s| {
            if s.render.is_loading {
                return Err(SessionError::GenerationInFlight);
            }
            s.settings = settings;
            Ok(())
        })
        .await??;

    let snapshot = state
        .store
        .with_session(&id, |s| SessionSnapshot::from_session(id, s))
        .await?;
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/:id - Destroy the session and everything it
/// owns. Any in-flight generation result becomes stale and is discarded on
/// arrival.
pub async fn reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.remove(&id).await?;
    tracing::info!(session_id = %id, "session reset");
    Ok(StatusCode::NO_CONTENT)
}
