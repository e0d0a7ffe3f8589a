// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Inference service credential. Absent is tolerated at startup but
    /// every generation attempt fails fast with a configuration error.
    pub api_key: Option<String>,
    /// Primary inference model.
    pub primary_model: String,
    /// Fallback inference model, tried once when the primary fails.
    pub fallback_model: String,
    /// Maximum upload size in MB.
    pub max_file_size_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum pages kept per document.
    pub page_cap: usize,
    /// Pages scanned for classification keywords.
    pub page_scan_limit: usize,
    /// PDF rasterization scale factor.
    pub render_scale: f32,
    /// Allowed CORS origins (comma-separated, or "*" for all in development).
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .unwrap_or(8080),
            api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            primary_model: std::env::var("GEMINI_PRIMARY_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-image".into()),
            fallback_model: std::env::var("GEMINI_FALLBACK_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash-preview-image-generation".into()),
            max_file_size_mb: std::env::var("MAX_FILE_SIZE_MB")
                .unwrap_or_else(|_| "50".into())
                .parse()
                .unwrap_or(50),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "300".into())
                .parse()
                .unwrap_or(300),
            page_cap: std::env::var("PAGE_CAP")
                .unwrap_or_else(|_| "12".into())
                .parse()
                .unwrap_or(12),
            page_scan_limit: std::env::var("PAGE_SCAN_LIMIT")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),
            render_scale: std::env::var("RENDER_SCALE")
                .unwrap_or_else(|_| "1.5".into())
                .parse()
                .unwrap_or(1.5),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| {
                    // Default: allow common development origins
                    "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000,http://127.0.0.1:5173".into()
                })
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
