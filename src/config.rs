use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default upstream endpoint root.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Service configuration.
///
/// Loaded from an optional `storyforge.toml` next to the binary (path
/// overridable with `STORYFORGE_CONFIG`), with environment variables taking
/// precedence over the file. The upstream credential is never read from the
/// file — only from `GEMINI_API_KEY` / `GOOGLE_API_KEY`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Bind address for the HTTP gateway.
    pub host: String,
    pub port: u16,

    /// Root of the upstream generation API.
    pub upstream_base_url: String,

    /// Model used for text generation (storyboards, analysis, refinement).
    pub text_model: String,
    /// Model used for image generation.
    pub image_model: String,
    /// Model used for text-to-speech.
    pub tts_model: String,

    /// Directory of YAML prompt template definitions.
    pub templates_dir: PathBuf,

    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8009,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.into(),
            text_model: "gemini-2.5-flash-preview-05-20".into(),
            image_model: "gemini-2.5-flash-image-preview".into(),
            tts_model: "gemini-2.5-flash-preview-tts".into(),
            templates_dir: PathBuf::from("prompts"),
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration: file (if present), then environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("STORYFORGE_CONFIG")
            .map_or_else(|_| PathBuf::from("storyforge.toml"), PathBuf::from);

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Environment variables win over the config file.
    ///
    /// Credential resolution order: `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("STORYFORGE_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("STORYFORGE_PORT")
            && let Ok(port) = port.parse()
        {
            self.port = port;
        }
        if let Ok(url) = std::env::var("STORYFORGE_UPSTREAM_URL") {
            self.upstream_base_url = url;
        }
        if let Ok(dir) = std::env::var("STORYFORGE_TEMPLATES_DIR") {
            self.templates_dir = PathBuf::from(dir);
        }

        self.api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|key| !key.is_empty());
    }
}
