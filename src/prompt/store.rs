use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// One variable declaration inside a template definition.
#[derive(Debug, Clone, Deserialize)]
pub struct VariableDef {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A named prompt definition loaded from one YAML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateDef {
    /// Explicit name; falls back to the file stem when absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Response schema forwarded verbatim to the upstream API.
    #[serde(default)]
    pub response_schema: Option<Value>,
    #[serde(default)]
    pub variables: Vec<VariableDef>,
}

/// Read-only registry of prompt definitions, keyed by name.
///
/// Populated once at startup and shared behind an `Arc` — concurrent reads
/// need no locking.
pub struct TemplateStore {
    templates: HashMap<String, TemplateDef>,
}

impl TemplateStore {
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Load every `*.yaml` / `*.yml` definition under `dir`.
    ///
    /// A file that fails to parse is logged and skipped; the rest of the
    /// directory still loads. A later file silently overwrites an earlier
    /// definition with the same name.
    pub fn load(dir: &Path) -> Self {
        let mut store = Self::empty();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("templates directory {} not readable: {e}", dir.display());
                return store;
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("yaml" | "yml")
                )
            })
            .collect();
        // Deterministic overwrite order.
        paths.sort();

        for path in paths {
            match Self::load_file(&path) {
                Ok((name, def)) => {
                    tracing::info!("loaded template: {name}");
                    store.templates.insert(name, def);
                }
                Err(e) => {
                    tracing::error!("error loading template {}: {e}", path.display());
                }
            }
        }

        store
    }

    fn load_file(path: &Path) -> anyhow::Result<(String, TemplateDef)> {
        let raw = std::fs::read_to_string(path)?;
        let def: TemplateDef = serde_yaml::from_str(&raw)?;
        let name = def
            .name
            .clone()
            .or_else(|| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(String::from)
            })
            .ok_or_else(|| anyhow::anyhow!("definition has no usable name"))?;
        Ok((name, def))
    }

    pub fn get(&self, name: &str) -> Option<&TemplateDef> {
        self.templates.get(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Names of every loaded definition, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Register a definition directly (test fixtures).
    pub fn insert(&mut self, name: impl Into<String>, def: TemplateDef) {
        self.templates.insert(name.into(), def);
    }
}
