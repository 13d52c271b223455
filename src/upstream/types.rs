//! Wire structures for the upstream `generateContent` API.
//!
//! The response accessors are the only place nested response fields are
//! walked: callers get a typed artifact or a `MalformedResponse` error,
//! never a silently-defaulted structure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServiceError;

// ─── Request ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    /// Echoed model id; only the TTS payload carries it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl GenerateContentRequest {
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content { parts }],
            system_instruction: None,
            generation_config: None,
            model: None,
        }
    }

    /// Attach a system instruction unless the text is empty.
    pub fn with_system_instruction(mut self, text: &str) -> Self {
        if !text.is_empty() {
            self.system_instruction = Some(Content {
                parts: vec![Part::text(text)],
            });
        }
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    pub fn with_model_echo(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Inline binary payload: MIME type plus base64 bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

impl GenerationConfig {
    /// Request a single non-text modality (`IMAGE`, `AUDIO`).
    pub fn modality(modality: &str) -> Self {
        Self {
            response_modalities: Some(vec![modality.to_string()]),
            ..Self::default()
        }
    }

    /// Request structured JSON output, optionally schema-constrained.
    pub fn json(schema: Option<Value>) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: schema,
            ..Self::default()
        }
    }
}

// ─── Response ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    pub error: Option<UpstreamErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "inlineData", default)]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamErrorBody {
    #[serde(default)]
    pub message: String,
}

impl GenerateContentResponse {
    fn parts(&self) -> Result<&[ResponsePart], ServiceError> {
        self.candidates
            .as_deref()
            .and_then(<[Candidate]>::first)
            .map(|candidate| candidate.content.parts.as_slice())
            .ok_or_else(|| ServiceError::MalformedResponse("no candidates returned".into()))
    }

    /// First text part of the first candidate.
    pub fn first_text(&self) -> Result<&str, ServiceError> {
        self.parts()?
            .iter()
            .find_map(|part| part.text.as_deref())
            .ok_or_else(|| ServiceError::MalformedResponse("no text part in response".into()))
    }

    /// First inline binary part of the first candidate.
    pub fn first_inline_data(&self) -> Result<&InlineData, ServiceError> {
        self.parts()?
            .iter()
            .find_map(|part| part.inline_data.as_ref())
            .ok_or_else(|| {
                ServiceError::MalformedResponse("no inline data part in response".into())
            })
    }
}
