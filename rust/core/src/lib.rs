// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core domain logic for kitchen visualization from floor-plan drawings.
//!
//! This crate holds everything with real branching and sequencing logic,
//! free of I/O so it can be tested in isolation:
//!
//! 1. Design settings as closed enums with exhaustive prompt-phrase tables
//! 2. Page classification (keyword heuristic) and click-ordered selection
//! 3. Deterministic, mode-dependent prompt construction
//! 4. Generation orchestration with a two-tier model fallback, behind an
//!    inference-client trait
//! 5. The render-session state machine with deterministic seeding and
//!    stale-completion tokens
//!
//! PDF rasterization lives in `showroom-ingest`; the HTTP surface and the
//! concrete inference client live in the server.

pub mod classify;
pub mod generate;
pub mod inference;
pub mod prompt;
pub mod session;
pub mod settings;

// Re-export commonly used types and functions
pub use classify::{classify_page, rank_pages, PageCategory, PageSelection};
pub use generate::{generate_render, GenerateError, ModelTiers};
pub use inference::{
    data_uri_mime, strip_data_uri, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, InferenceClient, InferenceError, PromptPart,
};
pub use prompt::{build_prompt, PromptMode};
pub use session::{derive_seed, reseed, DocumentMeta, Page, RenderState, Session, SessionError};
pub use settings::{CabinetColor, Countertop, DesignSettings, DoorStyle, ViewMode, WallColor};
