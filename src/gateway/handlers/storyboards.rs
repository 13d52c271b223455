use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AppState, preview};
use crate::error::ServiceError;
use crate::prompt::{self, VarMap};
use crate::upstream::{GenerateContentRequest, GenerationConfig, Part};

fn default_panel_count() -> u32 {
    8
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoryboardRequest {
    script: String,
    #[serde(default)]
    template_type: Option<String>,
    #[serde(default = "default_panel_count")]
    panel_count: u32,
}

/// POST /api/generate-storyboard
pub(in crate::gateway) async fn handle_generate_storyboard(
    State(state): State<AppState>,
    Json(req): Json<StoryboardRequest>,
) -> Result<Json<Value>, ServiceError> {
    state.client.ensure_configured()?;

    tracing::info!("generating storyboard for template: {:?}", req.template_type);

    let template_type = req.template_type.as_deref().filter(|t| !t.is_empty());
    let (system_prompt, user_prompt, schema) = match template_type {
        Some(template_type) => {
            let built = prompt::storyboard_prompt(
                &state.renderer,
                template_type,
                &req.script,
                req.panel_count,
            )?;
            (built.system_prompt, built.user_prompt, built.response_schema)
        }
        None => {
            // No template type: default script analysis.
            let mut vars = VarMap::new();
            vars.insert("script".into(), json!(req.script));
            let system = state.renderer.render_system_prompt("script_analysis", &vars)?;
            let user = state.renderer.render("script_analysis", &mut vars)?;
            let schema = state.renderer.response_schema("script_analysis").cloned();
            (system, user, schema)
        }
    };

    let request = GenerateContentRequest::new(vec![Part::text(user_prompt)])
        .with_system_instruction(&system_prompt)
        .with_generation_config(GenerationConfig::json(schema));
    let response = state
        .client
        .generate(&state.config.text_model, &request)
        .await?;

    let panels: Value = serde_json::from_str(response.first_text()?).map_err(|e| {
        ServiceError::MalformedResponse(format!("storyboard panels are not valid JSON: {e}"))
    })?;

    Ok(Json(json!({ "panels": panels })))
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoryAnalysisRequest {
    panels: Vec<Value>,
}

/// POST /api/analyze-story
pub(in crate::gateway) async fn handle_analyze_story(
    State(state): State<AppState>,
    Json(req): Json<StoryAnalysisRequest>,
) -> Result<Json<Value>, ServiceError> {
    state.client.ensure_configured()?;

    if req.panels.len() < 3 {
        return Err(ServiceError::Validation(
            "Need at least 3 panels to perform story analysis".into(),
        ));
    }

    tracing::info!("analyzing story with {} panels", req.panels.len());

    let full_script = combined_script(&req.panels);

    let mut vars = VarMap::new();
    vars.insert("storyboard_script".into(), json!(full_script));
    let system_prompt = state.renderer.render_system_prompt("story_analysis", &vars)?;
    let user_prompt = state.renderer.render("story_analysis", &mut vars)?;

    let request = GenerateContentRequest::new(vec![Part::text(user_prompt)])
        .with_system_instruction(&system_prompt);
    let response = state
        .client
        .generate(&state.config.text_model, &request)
        .await?;

    Ok(Json(json!({ "analysis": response.first_text()? })))
}

/// Flatten panels into a readable script for the analysis prompt.
fn combined_script(panels: &[Value]) -> String {
    panels
        .iter()
        .enumerate()
        .map(|(i, panel)| {
            let prompt = panel.get("prompt").and_then(Value::as_str).unwrap_or("N/A");
            let audio = panel.get("audio").and_then(Value::as_str).unwrap_or("N/A");
            format!("Panel {}:\nPROMPT: {prompt}\nAUDIO: {audio}", i + 1)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScriptRefinementRequest {
    natural_language: String,
}

/// POST /api/refine-script
pub(in crate::gateway) async fn handle_refine_script(
    State(state): State<AppState>,
    Json(req): Json<ScriptRefinementRequest>,
) -> Result<Json<Value>, ServiceError> {
    state.client.ensure_configured()?;

    if req.natural_language.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Natural language description is required".into(),
        ));
    }

    tracing::info!(
        "refining natural language to script: {}...",
        preview(&req.natural_language)
    );

    let mut vars = VarMap::new();
    vars.insert("natural_language".into(), json!(req.natural_language));
    let system_prompt = state
        .renderer
        .render_system_prompt("script_refinement", &vars)?;
    let user_prompt = state.renderer.render("script_refinement", &mut vars)?;

    let request = GenerateContentRequest::new(vec![Part::text(user_prompt)])
        .with_system_instruction(&system_prompt);
    let response = state
        .client
        .generate(&state.config.text_model, &request)
        .await?;

    let refined = response.first_text()?;
    if refined.trim().is_empty() {
        return Err(ServiceError::MalformedResponse(
            "upstream returned an empty script".into(),
        ));
    }

    Ok(Json(json!({ "refined_script": refined })))
}
