use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Storyforge.
///
/// Every request handler returns these; the gateway maps each variant onto an
/// HTTP status and a `{"error": ...}` JSON body. Internal startup code uses
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum ServiceError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    // ── Request validation ──────────────────────────────────────────────
    #[error("{0}")]
    Validation(String),

    #[error("request too large: {0}")]
    TooLarge(String),

    // ── Prompt / Template ───────────────────────────────────────────────
    #[error(transparent)]
    Template(#[from] TemplateError),

    // ── Upstream generation API ─────────────────────────────────────────
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    // ── Media post-processing ───────────────────────────────────────────
    #[error("image processing failed: {0}")]
    ImageProcessing(#[from] image::ImageError),
}

// ─── Prompt / Template errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),

    #[error("template '{0}' has no template content")]
    Empty(String),

    #[error("required variable '{variable}' not provided for template '{template}'")]
    MissingVariable { template: String, variable: String },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ServiceError>;
