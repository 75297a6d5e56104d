use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8080".to_string(),
        "http://127.0.0.1:8080".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Directory holding model.json, scaler.json and feature_info.json
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models")
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Maximum items accepted by /predict/batch
    #[serde(default = "default_batch_max_size")]
    pub max_size: usize,
}

fn default_batch_max_size() -> usize {
    100
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_size: default_batch_max_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Filter built from `level`. It applies to this crate's own targets as
    /// well, so `warn` silences the per-request info lines.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::new(&self.level)
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("server.port", 8000)?
            .set_default("batch.max_size", 100)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("KANTEI_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (KANTEI_MODEL__DIR, etc.)
            .add_source(
                Environment::with_prefix("KANTEI")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tracing::level_filters::LevelFilter;

    // load_from reads process-wide KANTEI_* variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn empty_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kantei-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn defaults_match_the_service_contract() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.batch.max_size, 100);
        assert_eq!(cfg.model.dir, PathBuf::from("models"));
        assert_eq!(cfg.server.cors_origins.len(), 2);
        assert!(!cfg.logging.json);
    }

    #[test]
    fn reads_default_toml() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = empty_dir();
        std::fs::write(
            dir.join("default.toml"),
            "[server]\nport = 9100\n\n[model]\ndir = \"/srv/models\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&dir).unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.model.dir, PathBuf::from("/srv/models"));
        assert_eq!(cfg.batch.max_size, 100);
    }

    #[test]
    fn environment_overrides_files_and_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = empty_dir();
        std::fs::write(dir.join("default.toml"), "[server]\nport = 9100\n").unwrap();

        std::env::set_var("KANTEI_SERVER__PORT", "9999");
        std::env::set_var(
            "KANTEI_SERVER__CORS_ORIGINS",
            "https://a.example,https://b.example",
        );
        std::env::set_var("KANTEI_MODEL__DIR", "/srv/kantei/models");
        let loaded = AppConfig::load_from(&dir);
        std::env::remove_var("KANTEI_SERVER__PORT");
        std::env::remove_var("KANTEI_SERVER__CORS_ORIGINS");
        std::env::remove_var("KANTEI_MODEL__DIR");
        let _ = std::fs::remove_dir_all(&dir);

        let cfg = loaded.unwrap();
        assert_eq!(cfg.server.port, 9999);
        assert_eq!(
            cfg.server.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(cfg.model.dir, PathBuf::from("/srv/kantei/models"));
    }

    #[test]
    fn log_level_applies_to_own_targets() {
        let quiet = LoggingConfig {
            level: "warn".to_string(),
            json: false,
        };
        assert_eq!(quiet.env_filter().max_level_hint(), Some(LevelFilter::WARN));

        let chatty = LoggingConfig {
            level: "debug".to_string(),
            json: false,
        };
        assert_eq!(chatty.env_filter().max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
