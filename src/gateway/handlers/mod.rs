//! Request handlers, grouped by feature area.

mod audio;
mod images;
mod sessions;
mod storyboards;

pub(super) use audio::handle_generate_audio;
pub(super) use images::{
    handle_analyze_style, handle_generate_image, handle_generate_style,
    handle_generate_suggestions,
};
pub(super) use sessions::{handle_create_session, handle_delete_session, handle_get_session};
pub(super) use storyboards::{
    handle_analyze_story, handle_generate_storyboard, handle_refine_script,
};

use axum::extract::State;
use axum::response::Json;
use serde_json::{Value, json};

use super::AppState;

/// Style applied when a request omits one.
pub(crate) const DEFAULT_STYLE: &str = "Cinematic Realism";

pub(crate) fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

/// GET / — service banner.
pub(super) async fn handle_root() -> Json<Value> {
    Json(json!({
        "message": "Storyforge backend API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health
pub(super) async fn handle_health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "templates": state.renderer.store().len(),
    }))
}

/// Split a `data:<mime>;base64,<payload>` URL into MIME type and payload.
pub(crate) fn parse_data_url(url: &str) -> Option<(String, String)> {
    let rest = url.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let mime = header.split(';').next().filter(|mime| !mime.is_empty())?;
    Some((mime.to_string(), data.to_string()))
}

/// First few characters of `text` for log lines.
pub(crate) fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}
