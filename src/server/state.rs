use std::sync::Arc;

use crate::config::Settings;
use crate::error::AppError;
use crate::prompt::{create_category_store, CategoryStore, StoreResult};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<CategoryStore>,
}

impl AppState {
    pub fn new(settings: Settings) -> StoreResult<Self> {
        let store = create_category_store(&settings.storage)?;

        Ok(Self {
            settings: Arc::new(settings),
            store,
        })
    }

    /// Run a store operation on the blocking pool.
    ///
    /// The store does synchronous file I/O, so handlers go through here
    /// instead of calling it on the runtime threads.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&CategoryStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| AppError::Storage(format!("Store task failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::prompt::{PromptCategory, StoreError};

    fn test_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.storage = StorageConfig {
            prompts_dir: dir.path().to_string_lossy().into_owned(),
            extension: "json".to_string(),
        };
        (dir, AppState::new(settings).unwrap())
    }

    #[tokio::test]
    async fn test_with_store_runs_operation() {
        let (_dir, state) = test_state();
        state
            .store
            .save("greetings", &PromptCategory::new("greetings"))
            .unwrap();

        let names = state.with_store(|store| store.list_categories()).await.unwrap();
        assert_eq!(names, vec!["greetings"]);

        let missing = state
            .with_store(|store| store.load("ghost"))
            .await
            .unwrap();
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_with_store_reports_panicked_task() {
        let (_dir, state) = test_state();

        let result: Result<(), AppError> = state
            .with_store(|_| panic!("store operation panicked"))
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
