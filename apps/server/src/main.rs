// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Showroom Server - kitchen visualization from floor-plan drawings.
//!
//! Upload a floor plan (image or multi-page PDF), pick the pages that
//! matter, configure materials, and generate photorealistic 3D renders or
//! colorized 2D plans through a generative image model.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/sessions` - Upload a document, create a session
//! - `GET /api/v1/sessions/:id` - Session snapshot
//! - `POST /api/v1/sessions/:id/pages/:index/toggle` - Page selection
//! - `PUT /api/v1/sessions/:id/settings` - Replace design settings
//! - `POST /api/v1/sessions/:id/generate` - Fresh render
//! - `POST /api/v1/sessions/:id/refine` - Re-texture the last render
//! - `POST /api/v1/sessions/:id/regenerate` - Fresh render, new seed
//! - `POST /api/v1/sessions/:id/back` - Back to page selection
//! - `GET /api/v1/sessions/:id/render` - Download the render
//! - `DELETE /api/v1/sessions/:id` - Reset

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;
use services::{GeminiClient, SessionStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    /// Absent when no API key is configured; generation then fails fast
    /// with a configuration error instead of an opaque network failure.
    pub inference: Option<Arc<GeminiClient>>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,showroom_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        max_file_size_mb = config.max_file_size_mb,
        page_cap = config.page_cap,
        primary_model = %config.primary_model,
        fallback_model = %config.fallback_model,
        api_key_configured = config.api_key.is_some(),
        "Starting Showroom Server"
    );

    if config.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; uploads will work but generation will fail");
    }

    let inference = config
        .api_key
        .clone()
        .map(|key| Arc::new(GeminiClient::new(key)));

    let state = AppState {
        store: Arc::new(SessionStore::new()),
        inference,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Session lifecycle
        .route("/api/v1/sessions", post(routes::session::create))
        .route("/api/v1/sessions/:id", get(routes::session::get))
        .route("/api/v1/sessions/:id", delete(routes::session::reset))
        .route(
            "/api/v1/sessions/:id/pages/:index/toggle",
            post(routes::session::toggle_page),
        )
        .route(
            "/api/v1/sessions/:id/settings",
            put(routes::session::update_settings),
        )
        // Generation
        .route("/api/v1/sessions/:id/generate", post(routes::render::generate))
        .route("/api/v1/sessions/:id/refine", post(routes::render::refine))
        .route(
            "/api/v1/sessions/:id/regenerate",
            post(routes::render::regenerate),
        )
        .route(
            "/api/v1/sessions/:id/back",
            post(routes::render::back_to_selection),
        )
        .route("/api/v1/sessions/:id/render", get(routes::render::download))
        // Middleware
        .layer(DefaultBodyLimit::max(config.max_file_size_mb * 1024 * 1024))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
