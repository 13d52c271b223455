use serde_json::Value;

use super::store::{TemplateDef, TemplateStore};
use crate::error::TemplateError;

/// Variable bindings for one render call.
pub type VarMap = serde_json::Map<String, Value>;

/// Renders named templates with permissive substitution.
///
/// Substitution is intentionally loose: every `{{ name }}` / `{{name}}`
/// reference with a binding is replaced by the value's string form, and any
/// reference without a binding is left in the output verbatim. Callers rely
/// on that for partial templates, so it is a contract, not an accident.
pub struct PromptRenderer {
    store: TemplateStore,
}

impl PromptRenderer {
    pub fn new(store: TemplateStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Render the user-prompt text of `name` with `variables`.
    ///
    /// Declared defaults are written into `variables` before validation, so
    /// the caller's map reflects exactly what was substituted.
    pub fn render(&self, name: &str, variables: &mut VarMap) -> Result<String, TemplateError> {
        let def = self.lookup(name)?;
        if def.template.is_empty() {
            return Err(TemplateError::Empty(name.to_string()));
        }

        Self::fill_defaults_and_validate(name, def, variables)?;
        Ok(substitute(&def.template, variables))
    }

    /// Render the optional system-prompt text of `name`.
    ///
    /// An absent system prompt renders as the empty string. Unlike `render`,
    /// no required-variable validation or default-filling happens here; the
    /// paired user-prompt render performs it.
    pub fn render_system_prompt(
        &self,
        name: &str,
        variables: &VarMap,
    ) -> Result<String, TemplateError> {
        let def = self.lookup(name)?;
        Ok(def
            .system_prompt
            .as_deref()
            .map(|text| substitute(text, variables))
            .unwrap_or_default())
    }

    /// Response schema of `name`, if the definition declares one.
    pub fn response_schema(&self, name: &str) -> Option<&Value> {
        self.store
            .get(name)
            .and_then(|def| def.response_schema.as_ref())
    }

    fn lookup(&self, name: &str) -> Result<&TemplateDef, TemplateError> {
        self.store
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    fn fill_defaults_and_validate(
        name: &str,
        def: &TemplateDef,
        variables: &mut VarMap,
    ) -> Result<(), TemplateError> {
        for var in &def.variables {
            if !variables.contains_key(&var.name)
                && let Some(default) = &var.default
            {
                variables.insert(var.name.clone(), default.clone());
            }
        }

        for var in &def.variables {
            if var.required && !variables.contains_key(&var.name) {
                return Err(TemplateError::MissingVariable {
                    template: name.to_string(),
                    variable: var.name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Replace every bound `{{ name }}` / `{{name}}` reference; leave the rest.
fn substitute(template: &str, variables: &VarMap) -> String {
    let mut out = template.to_string();
    for (name, value) in variables {
        let rendered = value_text(value);
        out = out.replace(&format!("{{{{ {name} }}}}"), &rendered);
        out = out.replace(&format!("{{{{{name}}}}}"), &rendered);
    }
    out
}

/// String form of a bound value: strings verbatim, everything else as its
/// JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
