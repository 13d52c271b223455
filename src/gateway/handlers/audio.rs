use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;

use super::{AppState, preview};
use crate::error::ServiceError;
use crate::media;
use crate::upstream::{GenerateContentRequest, GenerationConfig, Part};

#[derive(Debug, Deserialize)]
pub(crate) struct AudioGenerationRequest {
    text: String,
}

/// POST /api/generate-audio — returns a downloadable WAV byte stream.
pub(in crate::gateway) async fn handle_generate_audio(
    State(state): State<AppState>,
    Json(req): Json<AudioGenerationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    state.client.ensure_configured()?;

    if req.text.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Text is required for audio generation".into(),
        ));
    }

    tracing::info!("generating audio for text: {}...", preview(&req.text));

    let request = GenerateContentRequest::new(vec![Part::text(req.text)])
        .with_generation_config(GenerationConfig::modality("AUDIO"))
        .with_model_echo(&state.config.tts_model);
    let response = state
        .client
        .generate(&state.config.tts_model, &request)
        .await?;

    let inline = response.first_inline_data()?;
    if !inline.mime_type.starts_with("audio/") {
        return Err(ServiceError::MalformedResponse(format!(
            "expected an audio payload, got {}",
            inline.mime_type
        )));
    }

    let sample_rate = media::sample_rate_from_mime(&inline.mime_type);
    let pcm = BASE64.decode(inline.data.as_bytes()).map_err(|e| {
        ServiceError::MalformedResponse(format!("inline audio payload is not valid base64: {e}"))
    })?;
    let wav = media::wrap_pcm(&pcm, sample_rate, 1, 16);

    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=audio.wav",
            ),
        ],
        wav,
    ))
}
