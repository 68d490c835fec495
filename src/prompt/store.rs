//! File-backed category storage
//!
//! Each category lives in `<prompts_dir>/<name>.<ext>`. Saving over an
//! existing category first copies the old bytes to `<name>.<ext>.backup`;
//! on-demand snapshots go to `<name>_<YYYYMMDD_HHMMSS>.backup.<ext>`.
//!
//! Nothing is cached: every call goes back to disk. There is no locking, so
//! concurrent saves of one category race and the last writer wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use crate::config::StorageConfig;
use crate::metrics::StoreMetrics;

use super::render::render;
use super::types::{
    validate_category_name, CatalogSummary, CategorySummary, PromptCategory, Rendered,
    StoreError, StoreResult,
};

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Durable mapping from category name to category data
#[derive(Debug)]
pub struct CategoryStore {
    prompts_dir: PathBuf,
    extension: String,
}

impl CategoryStore {
    /// Open the store, creating the prompts directory if needed
    pub fn new(config: &StorageConfig) -> StoreResult<Self> {
        let prompts_dir = PathBuf::from(&config.prompts_dir);

        fs::create_dir_all(&prompts_dir).map_err(|source| StoreError::Io {
            path: prompts_dir.clone(),
            source,
        })?;

        tracing::info!(dir = %prompts_dir.display(), "Prompt storage initialized");

        Ok(Self {
            prompts_dir,
            extension: config.extension.clone(),
        })
    }

    pub fn prompts_dir(&self) -> &Path {
        &self.prompts_dir
    }

    /// Path of the live file for a category
    pub fn category_path(&self, name: &str) -> PathBuf {
        self.prompts_dir.join(format!("{}.{}", name, self.extension))
    }

    /// Path of the rolling pre-update backup for a category
    pub fn rolling_backup_path(&self, name: &str) -> PathBuf {
        self.prompts_dir
            .join(format!("{}.{}.backup", name, self.extension))
    }

    fn timestamped_backup_path(&self, name: &str, at: NaiveDateTime) -> PathBuf {
        self.prompts_dir.join(format!(
            "{}_{}.backup.{}",
            name,
            at.format(BACKUP_TIMESTAMP_FORMAT),
            self.extension
        ))
    }

    pub fn exists(&self, name: &str) -> bool {
        validate_category_name(name).is_ok() && self.category_path(name).is_file()
    }

    /// Sorted names of all persisted categories.
    ///
    /// Only files whose stem is a valid category name count, which leaves out
    /// both kinds of backup.
    pub fn list_categories(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.prompts_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    dir = %self.prompts_dir.display(),
                    error = %e,
                    "Failed to read prompts directory"
                );
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == self.extension)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .filter(|stem| validate_category_name(stem).is_ok())
            .collect();

        names.sort();
        names.dedup();
        names
    }

    /// Load a category, telling absence apart from corruption
    pub fn load(&self, name: &str) -> StoreResult<PromptCategory> {
        let result = self.load_inner(name);
        StoreMetrics::record("load", &result);
        result
    }

    fn load_inner(&self, name: &str) -> StoreResult<PromptCategory> {
        validate_category_name(name)?;
        let path = self.category_path(name);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(category = %name, "Category file not found");
                return Err(StoreError::NotFound(name.to_string()));
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let mut category: PromptCategory =
            serde_json::from_str(&raw).map_err(|e| {
                tracing::error!(category = %name, error = %e, "Failed to parse category");
                StoreError::Corrupt {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            })?;

        if category.category.is_empty() {
            category.category = name.to_string();
        }

        tracing::debug!(category = %name, "Loaded category");
        Ok(category)
    }

    /// Replace a category wholesale, keeping the previous bytes as the
    /// rolling backup
    pub fn save(&self, name: &str, category: &PromptCategory) -> StoreResult<()> {
        let result = self.save_inner(name, category);
        StoreMetrics::record("save", &result);
        result
    }

    fn save_inner(&self, name: &str, category: &PromptCategory) -> StoreResult<()> {
        validate_category_name(name)?;
        category.validate(name)?;

        let serialized =
            serde_json::to_string_pretty(category).map_err(|source| StoreError::Serialization {
                name: name.to_string(),
                source,
            })?;

        let path = self.category_path(name);

        if path.exists() {
            let backup_path = self.rolling_backup_path(name);
            fs::copy(&path, &backup_path).map_err(|source| StoreError::Io {
                path: backup_path.clone(),
                source,
            })?;
            tracing::info!(backup = %backup_path.display(), "Created backup");
        }

        fs::write(&path, serialized).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(category = %name, "Saved category");
        Ok(())
    }

    /// Snapshot the current file under a timestamped name
    pub fn backup_timestamped(&self, name: &str) -> StoreResult<PathBuf> {
        self.backup_timestamped_at(name, Local::now().naive_local())
    }

    /// Snapshot the current file using the given capture time.
    ///
    /// Two snapshots in the same second share a file name; the later one wins.
    pub fn backup_timestamped_at(&self, name: &str, at: NaiveDateTime) -> StoreResult<PathBuf> {
        let result = self.backup_inner(name, at);
        StoreMetrics::record("backup", &result);
        result
    }

    fn backup_inner(&self, name: &str, at: NaiveDateTime) -> StoreResult<PathBuf> {
        validate_category_name(name)?;
        let path = self.category_path(name);

        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }

        let backup_path = self.timestamped_backup_path(name, at);
        fs::copy(&path, &backup_path).map_err(|source| StoreError::Io {
            path: backup_path.clone(),
            source,
        })?;

        tracing::info!(backup = %backup_path.display(), "Created timestamped backup");
        Ok(backup_path)
    }

    /// Summaries of every category that loads; the rest are skipped
    pub fn summarize(&self) -> CatalogSummary {
        let mut summary = CatalogSummary::default();

        for name in self.list_categories() {
            let category = match self.load(&name) {
                Ok(category) => category,
                Err(e) => {
                    tracing::warn!(category = %name, error = %e, "Skipping category in summary");
                    continue;
                }
            };

            let template_count = category.templates.len();
            summary.total_templates += template_count;
            summary.categories.insert(
                name,
                CategorySummary {
                    version: category.version,
                    description: category.description,
                    template_count,
                    template_names: category.templates.into_keys().collect(),
                },
            );
        }

        summary.total_categories = summary.categories.len();
        summary
    }

    /// Render one stored template with the given variables
    pub fn test_render(
        &self,
        category: &str,
        template_name: &str,
        variables: &serde_json::Value,
    ) -> StoreResult<Rendered> {
        let prompt_category = self.load(category)?;

        let template = prompt_category.templates.get(template_name).ok_or_else(|| {
            StoreError::TemplateNotFound {
                category: category.to_string(),
                template: template_name.to_string(),
            }
        })?;

        Ok(render(&template.content, variables)?)
    }
}

/// Create an Arc-wrapped category store
pub fn create_category_store(config: &StorageConfig) -> StoreResult<Arc<CategoryStore>> {
    Ok(Arc::new(CategoryStore::new(config)?))
}
