//! Prompt category storage and template rendering.
//!
//! This module provides:
//! - Category and template definitions with their on-disk defaults
//! - File-backed category storage with rolling and timestamped backups
//! - `$name` / `${name}` placeholder substitution for test renders
//!
//! # Example
//!
//! ```ignore
//! let store = CategoryStore::new(&settings.storage)?;
//!
//! let mut category = PromptCategory::new("greetings");
//! category
//!     .templates
//!     .insert("hello".to_string(), PromptTemplate::new("Hello $name"));
//!
//! store.save("greetings", &category)?;
//!
//! let rendered = store.test_render("greetings", "hello", &json!({"name": "Ada"}))?;
//! assert_eq!(rendered.rendered_text, "Hello Ada");
//! ```

mod render;
mod store;
mod types;

pub use render::{placeholder_names, render};
pub use store::{create_category_store, CategoryStore};
pub use types::{
    validate_category_name, CatalogSummary, CategorySummary, PromptCategory, PromptTemplate,
    RenderError, RenderResult, Rendered, StoreError, StoreResult, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_VERSION,
};
