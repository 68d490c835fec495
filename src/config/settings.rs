use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Largest accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one file per category
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: String,
    /// Category file extension, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Bearer credential required on every /api route
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_body_limit() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_prompts_dir() -> String {
    "prompts".to_string()
}

fn default_extension() -> String {
    "json".to_string()
}

fn default_api_key() -> String {
    "prompt-studio-dev-key".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env.local, then .env, if they exist
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("storage.prompts_dir", default_prompts_dir())?
            .set_default("storage.extension", default_extension())?
            .set_default("auth.api_key", default_api_key())?
            .set_default("log.format", default_log_format())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // PROMPT_STUDIO__SERVER__PORT, PROMPT_STUDIO__AUTH__API_KEY, etc.
            .add_source(
                Environment::with_prefix("PROMPT_STUDIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            // Short forms: PROMPT_STUDIO_API_KEY and PORT
            .set_override_option("auth.api_key", env::var("PROMPT_STUDIO_API_KEY").ok())?
            .set_override_option("server.port", env::var("PORT").ok())?;

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn is_json_logging(&self) -> bool {
        self.log.format.eq_ignore_ascii_case("json")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            body_limit: default_body_limit(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            prompts_dir: default_prompts_dir(),
            extension: default_extension(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.storage.prompts_dir, "prompts");
        assert_eq!(settings.storage.extension, "json");
        assert_eq!(settings.auth.api_key, "prompt-studio-dev-key");
        assert!(!settings.is_json_logging());
    }

    #[test]
    fn test_server_addr() {
        let mut settings = Settings::default();
        settings.server.host = "127.0.0.1".to_string();
        settings.server.port = 9090;
        assert_eq!(settings.server_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn test_partial_storage_section_uses_defaults() {
        let storage: StorageConfig =
            serde_json::from_str(r#"{"prompts_dir": "/srv/prompts"}"#).unwrap();
        assert_eq!(storage.prompts_dir, "/srv/prompts");
        assert_eq!(storage.extension, "json");
    }
}
