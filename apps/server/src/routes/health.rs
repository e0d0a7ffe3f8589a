// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health and service info endpoints.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// GET / - API information.
pub async fn info() -> Json<Value> {
    Json(json!({
        "service": "showroom-server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /api/v1/health",
            "upload": "POST /api/v1/sessions",
            "session": "GET /api/v1/sessions/:id",
            "toggle_page": "POST /api/v1/sessions/:id/pages/:index/toggle",
            "settings": "PUT /api/v1/sessions/:id/settings",
            "generate": "POST /api/v1/sessions/:id/generate",
            "refine": "POST /api/v1/sessions/:id/refine",
            "regenerate": "POST /api/v1/sessions/:id/regenerate",
            "back": "POST /api/v1/sessions/:id/back",
            "download": "GET /api/v1/sessions/:id/render",
            "reset": "DELETE /api/v1/sessions/:id",
        },
    }))
}

/// GET /api/v1/health - Health check.
pub async fn check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "sessions": state.store.len().await,
        "inference_configured": state.inference.is_some(),
    }))
}
