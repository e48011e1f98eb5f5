// src/config.rs
use crate::domain::errors::{AppError, AppResult};
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::path::Path;

/// Trade call validator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where validated trade calls are kept
    pub storage: StorageConfig,

    /// Reporting configuration
    pub report: ReportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Keep trade calls in memory only
    Memory,

    /// Append trade calls to a JSON-lines file
    Jsonl,
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// File path for the `jsonl` backend
    pub path: String,
}

/// Reporting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of symbols listed in the summary
    pub top_symbols: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "jsonl" => StorageBackend::Jsonl,
            other => {
                return Err(AppError::Config(format!(
                    "Unsupported storage backend: {}",
                    other
                )))
            }
        };

        let storage_config = StorageConfig {
            backend,
            path: env::var("STORAGE_PATH").unwrap_or_else(|_| "tradecalls.jsonl".to_string()),
        };

        let report_config = ReportConfig {
            top_symbols: env::var("SUMMARY_TOP_SYMBOLS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
        };

        let logging_config = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            to_file: env::var("LOG_TO_FILE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            file_path: env::var("LOG_FILE_PATH").ok(),
        };

        Ok(Config {
            storage: storage_config,
            report: report_config,
            logging: logging_config,
        })
    }

    /// Load configuration from the JSON file named by `CONFIG_FILE`, or from
    /// environment variables when it is unset
    pub fn load() -> AppResult<Self> {
        dotenv().ok();
        Self::load_from(env::var("CONFIG_FILE").ok())
    }

    pub fn load_from(config_file: Option<String>) -> AppResult<Self> {
        match config_file {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    /// Load configuration from a JSON file. Omitted sections keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();

        let log_level = match self.logging.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        };

        builder.filter_level(log_level);

        if self.logging.to_file {
            if let Some(file_path) = &self.logging.file_path {
                let file = File::create(file_path).map_err(|e| {
                    AppError::Config(format!("Failed to create log file: {}", e))
                })?;

                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
        }

        builder.try_init().map_err(|e| {
            AppError::Config(format!("Failed to initialize logger: {}", e))
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                path: "tradecalls.jsonl".to_string(),
            },
            report: ReportConfig { top_symbols: 5 },
            logging: LoggingConfig {
                level: "info".to_string(),
                to_file: false,
                file_path: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reads_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "storage": {"backend": "jsonl", "path": "calls.jsonl"},
                "report": {"top_symbols": 3}
            }"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path.display().to_string())).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Jsonl);
        assert_eq!(config.storage.path, "calls.jsonl");
        assert_eq!(config.report.top_symbols, 3);
        // Omitted section falls back to the default
        assert_eq!(config.logging, Config::default().logging);
    }

    #[test]
    fn backend_uses_lowercase_names() {
        let json = serde_json::to_string(&StorageBackend::Jsonl).unwrap();
        assert_eq!(json, "\"jsonl\"");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = Config::load_from(Some("/nonexistent/tradecall.json".to_string())).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{\"storage\": 1}").unwrap();
        assert!(matches!(Config::from_file(&path), Err(AppError::Config(_))));
    }
}
