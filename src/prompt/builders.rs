use serde_json::{Value, json};

use super::render::{PromptRenderer, VarMap};
use crate::error::TemplateError;

/// Template backing every image-generation prompt.
pub const IMAGE_TEMPLATE: &str = "image_generation_simple";

/// Build the final image-generation prompt.
pub fn image_prompt(
    renderer: &PromptRenderer,
    prompt: &str,
    style: &str,
    use_previous_context: bool,
) -> Result<String, TemplateError> {
    let mut vars = VarMap::new();
    vars.insert("prompt".into(), json!(prompt));
    vars.insert("style".into(), json!(style));
    vars.insert("use_previous_context".into(), json!(use_previous_context));
    renderer.render(IMAGE_TEMPLATE, &mut vars)
}

/// Rendered storyboard-template prompt triple.
#[derive(Debug)]
pub struct StoryboardPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
    pub response_schema: Option<Value>,
}

/// Build the prompt for a typed storyboard template.
///
/// The template name is derived as `{template_type}_template`.
pub fn storyboard_prompt(
    renderer: &PromptRenderer,
    template_type: &str,
    context: &str,
    panel_count: u32,
) -> Result<StoryboardPrompt, TemplateError> {
    let name = format!("{template_type}_template");

    let mut vars = VarMap::new();
    vars.insert("context".into(), json!(context));
    vars.insert("panel_count".into(), json!(panel_count));

    let system_prompt = renderer.render_system_prompt(&name, &vars)?;
    let user_prompt = renderer.render(&name, &mut vars)?;
    let response_schema = renderer.response_schema(&name).cloned();

    Ok(StoryboardPrompt {
        system_prompt,
        user_prompt,
        response_schema,
    })
}
