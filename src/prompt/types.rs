//! Prompt category types and error definitions

use std::collections::BTreeMap;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model assigned to templates that do not name one
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Token limit assigned to templates that do not set one
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Version assigned to categories that do not declare one
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Storage-specific error type
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Category '{0}' not found")]
    NotFound(String),

    #[error("Template '{template}' not found in category '{category}'")]
    TemplateNotFound { category: String, template: String },

    #[error("Invalid category name: {0}")]
    InvalidName(String),

    #[error("Invalid category: {0}")]
    Validation(String),

    #[error("Category '{name}' is corrupt: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize category '{name}': {source}")]
    Serialization {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound(_) | StoreError::TemplateNotFound { .. }
        )
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Renderer-specific error type
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Variables must be an object")]
    InvalidVariables,
}

/// Result type for rendering
pub type RenderResult<T> = Result<T, RenderError>;

fn default_model() -> Option<String> {
    Some(DEFAULT_MODEL.to_string())
}

fn default_max_tokens() -> Option<u32> {
    Some(DEFAULT_MAX_TOKENS)
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// A single reusable prompt body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Prompt text with `$name` / `${name}` placeholders
    pub content: String,

    #[serde(default)]
    pub description: String,

    /// Declared placeholder names. Advisory only, never checked against `content`.
    #[serde(default)]
    pub variables: Vec<String>,

    #[serde(default = "default_model")]
    pub model: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<u32>,
}

impl PromptTemplate {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            description: String::new(),
            variables: Vec::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// A named group of templates with shared metadata.
///
/// Serialized field order is the on-disk order: `version`, `category`,
/// `description`, `templates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptCategory {
    #[serde(default = "default_version")]
    pub version: String,

    /// Declared name; must match the storage key when saved
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Templates in file order
    #[serde(default)]
    pub templates: IndexMap<String, PromptTemplate>,
}

impl PromptCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            category: name.into(),
            description: String::new(),
            templates: IndexMap::new(),
        }
    }

    /// Validate the category against the storage key it is saved under
    pub fn validate(&self, key: &str) -> StoreResult<()> {
        if self.category != key {
            return Err(StoreError::Validation(format!(
                "declared category '{}' does not match '{}'",
                self.category, key
            )));
        }

        for (name, template) in &self.templates {
            if name.trim().is_empty() {
                return Err(StoreError::Validation(
                    "Template names must not be empty".to_string(),
                ));
            }

            if template.max_tokens == Some(0) {
                return Err(StoreError::Validation(format!(
                    "Template '{}': max_tokens must be positive",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Check that a category name is usable as a file stem
pub fn validate_category_name(name: &str) -> StoreResult<()> {
    if name.is_empty() || name.chars().count() > 64 {
        return Err(StoreError::InvalidName(
            "Name must be 1-64 characters".to_string(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(StoreError::InvalidName(
            "Name must contain only alphanumeric, dash, or underscore".to_string(),
        ));
    }

    Ok(())
}

/// Summary line for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub version: String,
    pub description: String,
    pub template_count: usize,
    pub template_names: Vec<String>,
}

/// Summary of every loadable category
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogSummary {
    pub categories: BTreeMap<String, CategorySummary>,
    pub total_categories: usize,
    pub total_templates: usize,
}

/// Outcome of a substitution pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub rendered_text: String,

    /// Placeholders with no provided value, in order of first appearance
    pub missing: Vec<String>,

    /// Every distinct placeholder, in order of first appearance
    pub template_variables: Vec<String>,

    /// Provided variable names, sorted
    pub provided_variables: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_defaults_when_fields_absent() {
        let template: PromptTemplate = serde_json::from_value(json!({
            "content": "Hi $name"
        }))
        .unwrap();

        assert_eq!(template.description, "");
        assert!(template.variables.is_empty());
        assert_eq!(template.model.as_deref(), Some(DEFAULT_MODEL));
        assert_eq!(template.max_tokens, Some(DEFAULT_MAX_TOKENS));
    }

    #[test]
    fn test_template_explicit_null_clears_optional_fields() {
        let template: PromptTemplate = serde_json::from_value(json!({
            "content": "x",
            "model": null,
            "max_tokens": null
        }))
        .unwrap();

        assert_eq!(template.model, None);
        assert_eq!(template.max_tokens, None);
    }

    #[test]
    fn test_category_serialized_field_order() {
        let mut category = PromptCategory::new("greetings");
        category
            .templates
            .insert("hello".to_string(), PromptTemplate::new("Hello $name"));

        let text = serde_json::to_string(&category).unwrap();
        let version = text.find("\"version\"").unwrap();
        let name = text.find("\"category\"").unwrap();
        let description = text.find("\"description\"").unwrap();
        let templates = text.find("\"templates\"").unwrap();

        assert!(version < name && name < description && description < templates);
    }

    #[test]
    fn test_duplicate_template_names_collapse() {
        let raw = r#"{
            "category": "dup",
            "templates": {
                "a": {"content": "first"},
                "a": {"content": "second"}
            }
        }"#;

        let category: PromptCategory = serde_json::from_str(raw).unwrap();
        assert_eq!(category.templates.len(), 1);
        assert_eq!(category.templates["a"].content, "second");
    }

    #[test]
    fn test_templates_keep_file_order() {
        let raw = r#"{
            "category": "ordered",
            "templates": {
                "zeta": {"content": "z"},
                "alpha": {"content": "a"},
                "mid": {"content": "m"}
            }
        }"#;

        let category: PromptCategory = serde_json::from_str(raw).unwrap();
        let names: Vec<&str> = category.templates.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        let text = serde_json::to_string(&category).unwrap();
        assert!(text.find("\"zeta\"").unwrap() < text.find("\"alpha\"").unwrap());
    }

    #[test]
    fn test_validate_name_mismatch() {
        let category = PromptCategory::new("other");
        assert!(matches!(
            category.validate("greetings"),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_zero_max_tokens() {
        let mut category = PromptCategory::new("greetings");
        let mut template = PromptTemplate::new("x");
        template.max_tokens = Some(0);
        category.templates.insert("t".to_string(), template);

        assert!(matches!(
            category.validate("greetings"),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_category_name_validation() {
        assert!(validate_category_name("system_prompts-v2").is_ok());
        assert!(validate_category_name("프롬프트").is_ok());
        assert!(validate_category_name(&"é".repeat(64)).is_ok());
        assert!(matches!(
            validate_category_name(""),
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(
            validate_category_name("../etc/passwd"),
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(
            validate_category_name(&"a".repeat(65)),
            Err(StoreError::InvalidName(_))
        ));
    }
}
