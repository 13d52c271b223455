//! In-memory per-project style sessions.
//!
//! Sessions keep generated-image history so later prompts can carry
//! visual-consistency instructions. Lifetime is bounded by process uptime;
//! nothing is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A base64 image payload with its MIME type, as clients send it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub base64: String,
    pub mime_type: String,
}

/// One recorded generation inside a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub prompt: String,
    pub image_url: String,
    pub cinematography: HashMap<String, String>,
}

/// Per-project consistency state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleSession {
    pub base_style: String,
    pub style_image: Option<InlineImage>,
    pub generated_images: Vec<GeneratedImage>,
    /// Present in the shape but never populated; see DESIGN.md.
    pub style_keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl StyleSession {
    fn new(base_style: &str, style_image: Option<InlineImage>) -> Self {
        Self {
            base_style: base_style.to_string(),
            style_image,
            generated_images: Vec::new(),
            style_keywords: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Consistency instructions to append to a prompt.
    ///
    /// Empty for a session with no keywords and no prior generations;
    /// otherwise one or two sentences, ready for direct concatenation.
    pub fn consistency_suffix(&self) -> String {
        let mut elements = Vec::new();

        if !self.style_keywords.is_empty() {
            elements.push(format!(
                "Maintain consistent style elements: {}",
                self.style_keywords.join(", ")
            ));
        }

        if !self.generated_images.is_empty() {
            elements
                .push("Maintain visual consistency with previous panels in this sequence".into());
        }

        if elements.is_empty() {
            String::new()
        } else {
            format!(" {}.", elements.join(". "))
        }
    }
}

/// Exclusive owner of every style session.
///
/// One lock guards the whole mapping; `append_generation` runs its
/// read-modify-write inside a single write guard, so concurrent requests for
/// the same project cannot lose updates.
pub struct StyleSessionStore {
    sessions: RwLock<HashMap<String, StyleSession>>,
}

impl StyleSessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Unconditionally (re)create the session, discarding prior state.
    pub async fn create(
        &self,
        project_id: &str,
        base_style: &str,
        style_image: Option<InlineImage>,
    ) -> StyleSession {
        let session = StyleSession::new(base_style, style_image);
        self.sessions
            .write()
            .await
            .insert(project_id.to_string(), session.clone());
        session
    }

    /// Existing session for `project_id`, or a fresh one with the given
    /// defaults. An existing session's state wins over the arguments.
    pub async fn get_or_create(
        &self,
        project_id: &str,
        base_style: &str,
        style_image: Option<InlineImage>,
    ) -> StyleSession {
        self.sessions
            .write()
            .await
            .entry(project_id.to_string())
            .or_insert_with(|| StyleSession::new(base_style, style_image))
            .clone()
    }

    pub async fn get(&self, project_id: &str) -> Option<StyleSession> {
        self.sessions.read().await.get(project_id).cloned()
    }

    /// Record one generation. Returns `false` (and logs) when the session
    /// does not exist.
    pub async fn append_generation(&self, project_id: &str, entry: GeneratedImage) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(project_id) {
            Some(session) => {
                session.generated_images.push(entry);
                true
            }
            None => {
                tracing::warn!("append_generation for unknown style session {project_id}");
                false
            }
        }
    }

    /// Remove the session. Deleting a nonexistent session is not an error.
    pub async fn delete(&self, project_id: &str) -> bool {
        self.sessions.write().await.remove(project_id).is_some()
    }
}
