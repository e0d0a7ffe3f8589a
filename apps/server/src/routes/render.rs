// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generation endpoints: fresh renders, refinement, regeneration and
//! download.
//!
//! Each handler follows the same three-phase discipline: transition the
//! session to Generating and snapshot the inputs under the lock, run the
//! orchestrator with no lock held, then re-lock and commit the outcome.
//! If the session was reset or superseded in the meantime, the result is
//! discarded.

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
    Json,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use showroom_core::{
    data_uri_mime, generate_render, strip_data_uri, DesignSettings, ModelTiers, SessionError,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::RenderResult;
use crate::AppState;

/// What kind of generation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GenerationKind {
    /// Fresh render from the selected drawing pages, current seed.
    Fresh,
    /// Re-texture the last render, locking geometry; same seed.
    Refine,
    /// Fresh render with a newly drawn random seed.
    NewSeed,
}

/// Inputs snapshotted under the session lock.
struct Prepared {
    token: u64,
    images: Vec<String>,
    mime_type: String,
    settings: DesignSettings,
    seed: u32,
    refinement: bool,
    transcript: Option<String>,
}

/// POST /api/v1/sessions/:id/generate
pub async fn generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RenderResult>, ApiError> {
    run_generation(&state, id, GenerationKind::Fresh).await
}

/// POST /api/v1/sessions/:id/refine
pub async fn refine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RenderResult>, ApiError> {
    run_generation(&state, id, GenerationKind::Refine).await
}

/// POST /api/v1/sessions/:id/regenerate
pub async fn regenerate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RenderResult>, ApiError> {
    run_generation(&state, id, GenerationKind::NewSeed).await
}

/// POST /api/v1/sessions/:id/back - Clear the render and return to page
/// selection; the document and selection survive.
pub async fn back_to_selection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .store
        .with_session_mut(&id, |s| s.back_to_selection())
        .await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

/// GET /api/v1/sessions/:id/render - Download the accepted render.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let image = state
        .store
        .with_session(&id, |s| s.render.generated_image.clone())
        .await?
        .ok_or_else(|| ApiError::NotFound("no render available for this session".into()))?;

    let mime_type = data_uri_mime(&image).unwrap_or("image/png").to_string();
    let bytes = STANDARD
        .decode(strip_data_uri(&image))
        .map_err(|e| ApiError::Internal(format!("stored render is not valid base64: {e}")))?;

    let filename = format!("kitchen-render-{}.png", chrono::Utc::now().timestamp_millis());

    Response::builder()
        .header(header::CONTENT_TYPE, mime_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Shared generation flow.
async fn run_generation(
    state: &AppState,
    id: Uuid,
    kind: GenerationKind,
) -> Result<Json<RenderResult>, ApiError> {
    // Fail fast on a missing credential: a clearly attributable
    // configuration error beats an opaque network failure.
    let client = state.inference.clone().ok_or_else(|| {
        ApiError::Configuration("GEMINI_API_KEY is not set; generation is unavailable".into())
    })?;
    let models = ModelTiers {
        primary: state.config.primary_model.clone(),
        fallback: state.config.fallback_model.clone(),
    };

    // Phase 1: under the lock, enter Generating and snapshot the inputs.
    let prepared = state
        .store
        .with_session_mut(&id, |session| -> Result<Prepared, ApiError> {
            let refinement = kind == GenerationKind::Refine;

            let refinement_source = if refinement {
                Some(
                    session
                        .render
                        .generated_image
                        .clone()
                        .ok_or(SessionError::NoRenderAvailable)?,
                )
            } else {
                None
            };

            let token = session.begin_generation()?;

            // Reseed only after the in-flight check has passed, so a
            // rejected request never mutates the seed.
            if kind == GenerationKind::NewSeed {
                session.set_seed(rand::random::<u32>() & 0x7fff_ffff);
            }

            let (images, mime_type, transcript) = match refinement_source {
                Some(image) => (vec![image], "image/png".to_string(), None),
                None => (
                    session.selected_images(),
                    session.submission_mime_type(),
                    session.transcript.clone(),
                ),
            };

            Ok(Prepared {
                token,
                images,
                mime_type,
                settings: session.settings,
                seed: session.render.seed,
                refinement,
                transcript,
            })
        })
        .await??;

    tracing::info!(
        session_id = %id,
        kind = ?kind,
        seed = prepared.seed,
        images = prepared.images.len(),
        "generation started"
    );

    // Phase 2: no lock held across the inference call.
    let outcome = generate_render(
        client.as_ref(),
        &models,
        &prepared.images,
        &prepared.mime_type,
        &prepared.settings,
        prepared.seed,
        prepared.refinement,
        prepared.transcript.as_deref(),
    )
    .await;

    // Phase 3: commit, unless the session moved on while we were away.
    match outcome {
        Ok(image) => {
            let committed = state
                .store
                .with_session_mut(&id, |s| s.complete_generation(prepared.token, image.clone()))
                .await
                .unwrap_or(false);

            if !committed {
                tracing::info!(session_id = %id, "discarding stale generation result");
                return Err(ApiError::Superseded);
            }

            tracing::info!(session_id = %id, seed = prepared.seed, "generation complete");
            Ok(Json(RenderResult {
                session_id: id,
                seed: prepared.seed,
                image,
            }))
        }
        Err(err) => {
            let message = err.to_string();
            tracing::warn!(session_id = %id, error = %message, "generation failed");
            // Best effort: the session may have been reset while in flight.
            let _ = state
                .store
                .with_session_mut(&id, |s| s.fail_generation(prepared.token, message))
                .await;
            Err(err.into())
        }
    }
}
