//! Prompt template layer: YAML-backed template store, permissive renderer,
//! and the feature-specific prompt builders.

mod builders;
mod render;
mod store;

pub use builders::{IMAGE_TEMPLATE, StoryboardPrompt, image_prompt, storyboard_prompt};
pub use render::{PromptRenderer, VarMap};
pub use store::{TemplateDef, TemplateStore, VariableDef};
