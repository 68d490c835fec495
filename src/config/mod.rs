mod settings;

pub use settings::{AuthConfig, LogConfig, ServerConfig, Settings, StorageConfig};
