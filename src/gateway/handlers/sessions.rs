use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AppState, default_style};
use crate::error::ServiceError;
use crate::session::InlineImage;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSessionRequest {
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default = "default_style")]
    base_style: String,
    #[serde(default)]
    style_image: Option<InlineImage>,
}

/// POST /api/create-style-session
pub(in crate::gateway) async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<Value>, ServiceError> {
    let project_id = req
        .project_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ServiceError::Validation("Project ID required".into()))?;

    state
        .sessions
        .create(&project_id, &req.base_style, req.style_image)
        .await;

    Ok(Json(json!({ "sessionId": project_id, "status": "created" })))
}

/// GET /api/style-session/{project_id}
pub(in crate::gateway) async fn handle_get_session(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Response {
    match state.sessions.get(&project_id).await {
        Some(session) => Json(session).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Style session not found" })),
        )
            .into_response(),
    }
}

/// DELETE /api/style-session/{project_id} — idempotent.
pub(in crate::gateway) async fn handle_delete_session(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Json<Value> {
    state.sessions.delete(&project_id).await;
    Json(json!({ "status": "cleared" }))
}
