// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generation orchestration: prompt assembly, two-tier model fallback and
//! result extraction.
//!
//! The orchestrator is stateless. It makes exactly two attempts at most:
//! the primary model once, and on any primary failure (transport error,
//! empty response, or a response that only explains itself in prose) the
//! identical request against the fallback model once. The error raised
//! after a failed fallback classifies the fallback's failure, which is the
//! detail a user can act on.

use thiserror::Error;

use crate::inference::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, InferenceClient,
    InferenceError, PromptPart,
};
use crate::prompt::{build_prompt, PromptMode};
use crate::settings::DesignSettings;

/// Longest failure detail surfaced to users.
const DETAIL_LIMIT: usize = 200;

/// Primary and fallback model identifiers.
#[derive(Debug, Clone)]
pub struct ModelTiers {
    pub primary: String,
    pub fallback: String,
}

/// Classified generation failure.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Both tiers failed outright; carries the fallback failure's detail.
    #[error("generation failed: {detail}")]
    Failed { detail: String },

    /// The model answered in prose instead of producing an image; the
    /// explanation is surfaced as the error detail.
    #[error("the model declined to render: {detail}")]
    NoImageReturned { detail: String },

    /// The response carried no usable parts at all.
    #[error("the model returned an empty response; try again")]
    EmptyResponse,
}

/// Outcome of one attempt against one model tier.
enum AttemptError {
    Transport(InferenceError),
    NoImage(String),
    Empty,
}

impl AttemptError {
    fn into_generate_error(self) -> GenerateError {
        match self {
            AttemptError::Transport(e) => GenerateError::Failed {
                detail: truncate(&e.to_string(), DETAIL_LIMIT),
            },
            AttemptError::NoImage(text) => GenerateError::NoImageReturned {
                detail: truncate(&text, DETAIL_LIMIT),
            },
            AttemptError::Empty => GenerateError::EmptyResponse,
        }
    }

    fn describe(&self) -> String {
        match self {
            AttemptError::Transport(e) => e.to_string(),
            AttemptError::NoImage(text) => format!("text-only response: {}", truncate(text, 80)),
            AttemptError::Empty => "empty response".to_string(),
        }
    }
}

/// Run one generation request end to end and return the rendered image as
/// a data URI.
///
/// `images` are the submission-ordered inputs (master view last); each may
/// be a full data URI or clean base64. All images share `mime_type`.
#[allow(clippy::too_many_arguments)]
pub async fn generate_render<C: InferenceClient + Sync>(
    client: &C,
    models: &ModelTiers,
    images: &[String],
    mime_type: &str,
    settings: &DesignSettings,
    seed: u32,
    refinement: bool,
    transcript: Option<&str>,
) -> Result<String, GenerateError> {
    let mode = PromptMode::for_request(settings.view_mode, refinement, images.len());
    let prompt = build_prompt(mode, settings, transcript);

    let mut parts = Vec::with_capacity(images.len() + 1);
    parts.push(PromptPart::text(prompt));
    for image in images {
        parts.push(PromptPart::inline(mime_type, image));
    }
    let request = GenerateContentRequest::new(parts, GenerationConfig::for_render(seed));

    match attempt(client, &models.primary, &request).await {
        Ok(image) => Ok(image),
        Err(primary_failure) => {
            tracing::warn!(
                model = %models.primary,
                failure = %primary_failure.describe(),
                "primary model failed, retrying with fallback"
            );
            attempt(client, &models.fallback, &request)
                .await
                .map_err(AttemptError::into_generate_error)
        }
    }
}

/// One attempt against one model: submit, then extract an image.
async fn attempt<C: InferenceClient + Sync>(
    client: &C,
    model: &str,
    request: &GenerateContentRequest,
) -> Result<String, AttemptError> {
    let response = client
        .generate_content(model, request)
        .await
        .map_err(AttemptError::Transport)?;
    extract_image(&response)
}

/// Pull the first inline image out of a response, or classify why there
/// was none.
fn extract_image(response: &GenerateContentResponse) -> Result<String, AttemptError> {
    let parts = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| content.parts.as_slice())
        .unwrap_or(&[]);

    for part in parts {
        if let Some(blob) = &part.inline_data {
            if !blob.data.is_empty() {
                return Ok(format!("data:image/png;base64,{}", blob.data));
            }
        }
    }

    let explanation = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join(" ");
    let explanation = explanation.trim();

    if explanation.is_empty() {
        Err(AttemptError::Empty)
    } else {
        Err(AttemptError::NoImage(explanation.to_string()))
    }
}

/// Truncate on a char boundary, appending an ellipsis when cut.
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{Blob, Candidate, CandidateContent, ResponsePart};
    use std::sync::Mutex;

    /// Scripted client: pops one canned result per call and records which
    /// models were invoked, in order.
    struct ScriptedClient {
        results: Mutex<Vec<Result<GenerateContentResponse, InferenceError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(results: Vec<Result<GenerateContentResponse, InferenceError>>) -> Self {
            Self {
                results: Mutex::new(results),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl InferenceClient for ScriptedClient {
        async fn generate_content(
            &self,
            model: &str,
            _request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, InferenceError> {
            self.calls.lock().unwrap().push(model.to_string());
            self.results.lock().unwrap().remove(0)
        }
    }

    fn image_response(data: &str) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![ResponsePart {
                        text: None,
                        inline_data: Some(Blob {
                            mime_type: "image/png".to_string(),
                            data: data.to_string(),
                        }),
                    }],
                }),
            }],
        }
    }

    fn text_response(text: &str) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![ResponsePart {
                        text: Some(text.to_string()),
                        inline_data: None,
                    }],
                }),
            }],
        }
    }

    fn models() -> ModelTiers {
        ModelTiers {
            primary: "model-primary".to_string(),
            fallback: "model-fallback".to_string(),
        }
    }

    fn transport(msg: &str) -> InferenceError {
        InferenceError::Transport(msg.to_string())
    }

    async fn run(
        client: &ScriptedClient,
        images: &[String],
    ) -> Result<String, GenerateError> {
        generate_render(
            client,
            &models(),
            images,
            "image/jpeg",
            &DesignSettings::default(),
            7,
            false,
            None,
        )
        .await
    }

    #[tokio::test]
    async fn primary_success_never_touches_fallback() {
        let client = ScriptedClient::new(vec![Ok(image_response("QUJD"))]);
        let image = run(&client, &["AAAA".to_string()]).await.unwrap();
        assert_eq!(image, "data:image/png;base64,QUJD");
        assert_eq!(client.calls(), vec!["model-primary"]);
    }

    #[tokio::test]
    async fn primary_transport_failure_falls_back_once() {
        let client = ScriptedClient::new(vec![
            Err(transport("connection reset")),
            Ok(image_response("QUJD")),
        ]);
        let image = run(&client, &["AAAA".to_string()]).await.unwrap();
        assert_eq!(image, "data:image/png;base64,QUJD");
        assert_eq!(client.calls(), vec!["model-primary", "model-fallback"]);
    }

    #[tokio::test]
    async fn text_only_primary_also_falls_back() {
        let client = ScriptedClient::new(vec![
            Ok(text_response("cannot read this drawing")),
            Ok(image_response("QUJD")),
        ]);
        assert!(run(&client, &["AAAA".to_string()]).await.is_ok());
        assert_eq!(client.calls(), vec!["model-primary", "model-fallback"]);
    }

    #[tokio::test]
    async fn both_tiers_failing_raises_fallback_detail() {
        let client = ScriptedClient::new(vec![
            Err(transport("primary boom")),
            Err(transport("fallback boom")),
        ]);
        let err = run(&client, &["AAAA".to_string()]).await.unwrap_err();
        match err {
            GenerateError::Failed { detail } => {
                assert!(detail.contains("fallback boom"));
                assert!(!detail.contains("primary boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Exactly two attempts, each model invoked once.
        assert_eq!(client.calls(), vec!["model-primary", "model-fallback"]);
    }

    #[tokio::test]
    async fn declined_render_surfaces_the_explanation() {
        let client = ScriptedClient::new(vec![
            Ok(text_response("cannot process this image")),
            Ok(text_response("cannot process this image")),
        ]);
        let err = run(&client, &["AAAA".to_string()]).await.unwrap_err();
        match err {
            GenerateError::NoImageReturned { detail } => {
                assert_eq!(detail, "cannot process this image");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_responses_classify_as_empty() {
        let client = ScriptedClient::new(vec![
            Ok(GenerateContentResponse::default()),
            Ok(GenerateContentResponse::default()),
        ]);
        let err = run(&client, &["AAAA".to_string()]).await.unwrap_err();
        assert!(matches!(err, GenerateError::EmptyResponse));
    }

    #[test]
    fn long_details_truncate_with_ellipsis() {
        let long = "x".repeat(500);
        let detail = truncate(&long, DETAIL_LIMIT);
        assert_eq!(detail.len(), DETAIL_LIMIT + 3);
        assert!(detail.ends_with("..."));
    }
}
