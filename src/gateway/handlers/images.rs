use axum::extract::State;
use axum::response::Json;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;

use super::{AppState, default_style, parse_data_url, preview};
use crate::error::ServiceError;
use crate::media;
use crate::prompt::{self, VarMap};
use crate::session::{GeneratedImage, InlineImage};
use crate::upstream::{GenerateContentRequest, GenerationConfig, Part};

/// Upper bound on inline payload bytes accepted per request.
const MAX_INLINE_PAYLOAD_BYTES: usize = 45 * 1024 * 1024;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateImageRequest {
    prompt: String,
    #[serde(default = "default_style")]
    style: String,
    #[serde(default)]
    cinematography: HashMap<String, String>,
    #[serde(default)]
    ref_prev: bool,
    #[serde(default)]
    previous_image_url: Option<String>,
    #[serde(default)]
    style_image_base64: Option<String>,
    #[serde(default)]
    style_image_mime_type: Option<String>,
    #[serde(default)]
    asset_images: Vec<InlineImage>,
    #[serde(default)]
    project_style_id: Option<String>,
    #[serde(default = "default_true")]
    maintain_consistency: bool,
}

impl GenerateImageRequest {
    fn inline_payload_bytes(&self) -> usize {
        self.prompt.len()
            + self.style_image_base64.as_deref().map_or(0, str::len)
            + self.previous_image_url.as_deref().map_or(0, str::len)
            + self
                .asset_images
                .iter()
                .map(|asset| asset.base64.len())
                .sum::<usize>()
    }
}

/// POST /api/generate-image
pub(in crate::gateway) async fn handle_generate_image(
    State(state): State<AppState>,
    Json(req): Json<GenerateImageRequest>,
) -> Result<Json<Value>, ServiceError> {
    state.client.ensure_configured()?;

    tracing::info!("generating image for prompt: {}...", preview(&req.prompt));

    if req.inline_payload_bytes() > MAX_INLINE_PAYLOAD_BYTES {
        return Err(ServiceError::TooLarge(
            "please reduce image sizes or the number of assets".into(),
        ));
    }

    let style_image = req.style_image_base64.as_ref().map(|base64| InlineImage {
        base64: base64.clone(),
        mime_type: req
            .style_image_mime_type
            .clone()
            .unwrap_or_else(|| "image/png".into()),
    });

    let track_consistency = req.maintain_consistency && req.project_style_id.is_some();
    let session = if let (true, Some(project_id)) = (track_consistency, &req.project_style_id) {
        Some(
            state
                .sessions
                .get_or_create(project_id, &req.style, style_image.clone())
                .await,
        )
    } else {
        None
    };

    let mut final_prompt = prompt::image_prompt(
        &state.renderer,
        &req.prompt,
        &req.style,
        req.ref_prev && req.previous_image_url.is_some(),
    )?;
    if let Some(session) = &session {
        final_prompt.push_str(&session.consistency_suffix());
    }

    let mut parts = vec![Part::text(final_prompt)];
    for asset in &req.asset_images {
        parts.push(Part::inline_data(
            asset.mime_type.clone(),
            asset.base64.clone(),
        ));
    }
    if let Some(image) = &style_image {
        parts.push(Part::inline_data(
            image.mime_type.clone(),
            image.base64.clone(),
        ));
    }
    if req.ref_prev
        && let Some(url) = &req.previous_image_url
    {
        match parse_data_url(url) {
            Some((mime, data)) => parts.push(Part::inline_data(mime, data)),
            None => tracing::warn!("previous frame reference is not a data URL; skipping"),
        }
    }

    let request = GenerateContentRequest::new(parts)
        .with_generation_config(GenerationConfig::modality("IMAGE"));
    let response = state
        .client
        .generate(&state.config.image_model, &request)
        .await?;

    let inline = response.first_inline_data()?;
    let raw = BASE64.decode(inline.data.as_bytes()).map_err(|e| {
        ServiceError::MalformedResponse(format!("inline image payload is not valid base64: {e}"))
    })?;
    let cropped = media::center_crop_to_aspect(&raw, media::TARGET_ASPECT)?;
    let image_url = format!("data:image/jpeg;base64,{}", BASE64.encode(&cropped));

    if track_consistency
        && let Some(project_id) = &req.project_style_id
    {
        state
            .sessions
            .append_generation(
                project_id,
                GeneratedImage {
                    prompt: req.prompt.clone(),
                    image_url: image_url.clone(),
                    cinematography: req.cinematography.clone(),
                },
            )
            .await;
    }

    Ok(Json(json!({ "imageUrl": image_url })))
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestionsRequest {
    #[serde(default)]
    prompt: String,
}

/// POST /api/generate-suggestions
///
/// Fallback-over-failure: past the credential check, every failure yields an
/// empty suggestions list with status 200, never an error.
pub(in crate::gateway) async fn handle_generate_suggestions(
    State(state): State<AppState>,
    Json(req): Json<SuggestionsRequest>,
) -> Result<Json<Value>, ServiceError> {
    state.client.ensure_configured()?;

    if req.prompt.is_empty() {
        return Ok(Json(json!({ "suggestions": [] })));
    }

    tracing::info!("generating suggestions for: {}...", preview(&req.prompt));

    let suggestions = match suggest(&state, &req.prompt).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            tracing::error!("error generating suggestions: {e}");
            Value::Array(Vec::new())
        }
    };

    Ok(Json(json!({ "suggestions": suggestions })))
}

async fn suggest(state: &AppState, prompt: &str) -> Result<Value, ServiceError> {
    let mut vars = VarMap::new();
    vars.insert("current_shot".into(), json!(prompt));
    let user_prompt = state.renderer.render("shot_suggestions", &mut vars)?;
    let schema = state.renderer.response_schema("shot_suggestions").cloned();

    let request = GenerateContentRequest::new(vec![Part::text(user_prompt)])
        .with_generation_config(GenerationConfig::json(schema));
    let response = state
        .client
        .generate(&state.config.text_model, &request)
        .await?;

    serde_json::from_str(response.first_text()?).map_err(|e| {
        ServiceError::MalformedResponse(format!("suggestions are not valid JSON: {e}"))
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct StyleGenerationRequest {
    style: String,
}

/// POST /api/generate-style
pub(in crate::gateway) async fn handle_generate_style(
    State(state): State<AppState>,
    Json(req): Json<StyleGenerationRequest>,
) -> Result<Json<Value>, ServiceError> {
    state.client.ensure_configured()?;

    tracing::info!("generating style reference for: {}", req.style);

    let mut vars = VarMap::new();
    vars.insert("style".into(), json!(req.style));
    let style_prompt = state.renderer.render("style_generation", &mut vars)?;

    let request = GenerateContentRequest::new(vec![Part::text(style_prompt)])
        .with_generation_config(GenerationConfig::modality("IMAGE"));
    let response = state
        .client
        .generate(&state.config.image_model, &request)
        .await?;

    let inline = response.first_inline_data()?;
    let data_url = format!("data:image/png;base64,{}", inline.data);
    Ok(Json(json!({
        "base64": inline.data.clone(),
        "mimeType": "image/png",
        "dataUrl": data_url,
    })))
}

#[derive(Debug, Deserialize)]
pub(crate) struct StyleAnalysisRequest {
    image_base64: String,
    mime_type: String,
}

/// POST /api/analyze-style
///
/// Fallback-over-failure: upstream failure or malformed analysis JSON yields
/// a fixed placeholder description, never an error.
pub(in crate::gateway) async fn handle_analyze_style(
    State(state): State<AppState>,
    Json(req): Json<StyleAnalysisRequest>,
) -> Result<Json<Value>, ServiceError> {
    state.client.ensure_configured()?;

    tracing::info!("analyzing style from uploaded image");

    let analysis = match analyze(&state, &req).await {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::error!("style analysis failed: {e}");
            fallback_style_analysis()
        }
    };

    Ok(Json(analysis))
}

async fn analyze(state: &AppState, req: &StyleAnalysisRequest) -> Result<Value, ServiceError> {
    let mut vars = VarMap::new();
    vars.insert("mime_type".into(), json!(req.mime_type));

    let system_prompt = state.renderer.render_system_prompt("style_analysis", &vars)?;
    let user_prompt = state.renderer.render("style_analysis", &mut vars)?;
    let schema = state.renderer.response_schema("style_analysis").cloned();

    let request = GenerateContentRequest::new(vec![
        Part::text(user_prompt),
        Part::inline_data(req.mime_type.clone(), req.image_base64.clone()),
    ])
    .with_system_instruction(&system_prompt)
    .with_generation_config(GenerationConfig::json(schema));

    let response = state
        .client
        .generate(&state.config.text_model, &request)
        .await?;

    serde_json::from_str(response.first_text()?).map_err(|e| {
        ServiceError::MalformedResponse(format!("style analysis is not valid JSON: {e}"))
    })
}

fn fallback_style_analysis() -> Value {
    json!({
        "style_description": "Custom uploaded style",
        "style_name": "Custom Style",
        "characteristics": {
            "medium": "Unknown",
            "color_palette": "Varied",
            "lighting": "Mixed",
            "texture": "Original"
        }
    })
}
