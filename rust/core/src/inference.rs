// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire types and client trait for the image-inference service.
//!
//! The request/response shapes mirror the `generateContent` REST schema
//! (camelCase JSON). On the response side every field an upstream model
//! might omit is an `Option` or defaulted; the orchestrator maps each
//! missing-field case to a distinct error instead of letting a lookup fail
//! unguarded.

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// One part of a multimodal prompt: either instruction text or inline
/// image bytes.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PromptPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

impl PromptPart {
    pub fn text(text: impl Into<String>) -> Self {
        PromptPart::Text { text: text.into() }
    }

    /// Inline image data. Accepts either clean base64 or a full data URI;
    /// the URI prefix is stripped so the service receives clean base64.
    pub fn inline(mime_type: &str, data: &str) -> Self {
        PromptPart::InlineData {
            inline_data: Blob {
                mime_type: mime_type.to_string(),
                data: strip_data_uri(data).to_string(),
            },
        }
    }
}

/// Raw bytes with a mime type, base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

/// Request-side content wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<PromptPart>,
}

/// Generation parameters pinned per request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub seed: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

impl GenerationConfig {
    /// Standard render configuration: pinned seed, low temperature so
    /// multi-view and negative constraints are obeyed literally rather than
    /// creatively reinterpreted, 4:3 output.
    pub fn for_render(seed: u32) -> Self {
        Self {
            seed,
            temperature: 0.35,
            image_config: Some(ImageConfig {
                aspect_ratio: "4:3".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
}

/// Harm-category thresholds submitted with every request.
#[derive(Debug, Clone, Serialize)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

/// Architectural drawings occasionally trip over-eager filters; block only
/// high-severity content.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    const BLOCK_ONLY_HIGH: &str = "BLOCK_ONLY_HIGH";
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: BLOCK_ONLY_HIGH,
    })
    .collect()
}

/// Full request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateContentRequest {
    pub fn new(parts: Vec<PromptPart>, config: GenerationConfig) -> Self {
        Self {
            contents: vec![RequestContent { parts }],
            generation_config: config,
            safety_settings: default_safety_settings(),
        }
    }
}

/// Response body. Models may omit any of these fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<Blob>,
}

/// Transport-level failure from an inference client implementation.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("response decode failed: {0}")]
    Decode(String),
}

/// A client able to submit one `generateContent` request against a named
/// model. Implemented over HTTP in the server; tests substitute mocks.
pub trait InferenceClient {
    fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> impl Future<Output = Result<GenerateContentResponse, InferenceError>> + Send;
}

/// Strip a `data:<mime>;base64,` prefix, returning clean base64.
pub fn strip_data_uri(data: &str) -> &str {
    match data.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    }
}

/// Extract the mime type from a data URI, if present.
pub fn data_uri_mime(uri: &str) -> Option<&str> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, _) = rest.split_once(";base64,")?;
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_data_uri_handles_both_forms() {
        assert_eq!(strip_data_uri("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("AAAA"), "AAAA");
        // Base64 payloads never contain commas, so a bare comma-free string
        // passes through even if it looks odd.
        assert_eq!(strip_data_uri("not-a-uri,BBBB"), "not-a-uri,BBBB");
    }

    #[test]
    fn data_uri_mime_parses_prefix() {
        assert_eq!(data_uri_mime("data:image/jpeg;base64,AAAA"), Some("image/jpeg"));
        assert_eq!(data_uri_mime("AAAA"), None);
    }

    #[test]
    fn request_serializes_to_camel_case_wire_shape() {
        let request = GenerateContentRequest::new(
            vec![
                PromptPart::text("render this"),
                PromptPart::inline("image/jpeg", "data:image/jpeg;base64,QUJD"),
            ],
            GenerationConfig::for_render(42),
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "render this");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["data"], "QUJD");
        assert_eq!(json["generationConfig"]["seed"], 42);
        assert_eq!(json["generationConfig"]["imageConfig"]["aspectRatio"], "4:3");
        assert_eq!(json["safetySettings"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{}]}"#).unwrap();
        assert!(response.candidates[0].content.is_none());

        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"AA=="}}]}}]}"#,
        )
        .unwrap();
        let parts = &response.candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts[0].inline_data.as_ref().unwrap().data, "AA==");
    }
}
