//! Configuration for the task board server.
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`<config dir>/taskboard/config.toml`)
//! 4. Compiled defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors that can occur when loading server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A resolved value is out of range.
    #[error("invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending setting.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerConfigFile {
    server: ServerSection,
    database: DatabaseSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    bind_addr: Option<String>,
    operation_timeout_ms: Option<u64>,
    log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DatabaseSection {
    url: Option<String>,
    max_pool_size: Option<u32>,
}

/// CLI arguments for the task board server.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Taskboard HTTP server")]
pub struct ServerCliArgs {
    /// Address to bind the HTTP listener to.
    #[arg(short, long, env = "TASKBOARD_ADDR")]
    pub bind: Option<String>,

    /// Path to config file (default: `<config dir>/taskboard/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// `PostgreSQL` connection URL; tasks are kept in memory when unset.
    #[arg(long, env = "TASKBOARD_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Connection pool size for `PostgreSQL`.
    #[arg(long)]
    pub max_pool_size: Option<u32>,

    /// Upper bound on a single board operation, in milliseconds.
    #[arg(long)]
    pub operation_timeout_ms: Option<u64>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, env = "TASKBOARD_LOG")]
    pub log_level: Option<String>,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the listener to (e.g. `127.0.0.1:8080`).
    pub bind_addr: String,
    /// `PostgreSQL` URL, or `None` for the in-memory store.
    pub database_url: Option<String>,
    /// Connection pool size.
    pub max_pool_size: u32,
    /// Per-operation timeout.
    pub operation_timeout: Duration,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            database_url: None,
            max_pool_size: 8,
            operation_timeout: Duration::from_secs(5),
            log_level: "info".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// An explicit `--config` path must exist. Without one, the default path
    /// is tried and a missing file counts as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or a resolved value is out of range.
    pub fn load(cli: &ServerCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    fn resolve(cli: &ServerCliArgs, file: &ServerConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_pool_size = cli
            .max_pool_size
            .or(file.database.max_pool_size)
            .unwrap_or(defaults.max_pool_size);
        if max_pool_size == 0 {
            return Err(ConfigError::Invalid {
                field: "max_pool_size",
                reason: "must be at least 1",
            });
        }

        let operation_timeout = cli
            .operation_timeout_ms
            .or(file.server.operation_timeout_ms)
            .map_or(defaults.operation_timeout, Duration::from_millis);
        if operation_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "operation_timeout_ms",
                reason: "must be positive",
            });
        }

        Ok(Self {
            bind_addr: cli
                .bind
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            database_url: cli
                .database_url
                .clone()
                .or_else(|| file.database.url.clone()),
            max_pool_size,
            operation_timeout,
            log_level: cli
                .log_level
                .clone()
                .or_else(|| file.server.log_level.clone())
                .unwrap_or(defaults.log_level),
        })
    }
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<ServerConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ServerConfigFile::default());
    };
    let path = config_dir.join("taskboard").join("config.toml");
    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ServerConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerCliArgs, ServerConfig, ServerConfigFile, load_config_file};
    use rstest::rstest;
    use std::path::Path;
    use std::time::Duration;

    fn parse(toml_text: &str) -> ServerConfigFile {
        toml::from_str(toml_text).expect("valid TOML")
    }

    #[rstest]
    fn empty_file_resolves_to_defaults() {
        let config = ServerConfig::resolve(&ServerCliArgs::default(), &parse(""))
            .expect("defaults are valid");

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.database_url, None);
        assert_eq!(config.max_pool_size, 8);
        assert_eq!(config.operation_timeout, Duration::from_secs(5));
        assert_eq!(config.log_level, "info");
    }

    #[rstest]
    fn file_values_fill_unset_cli_fields() {
        let file = parse(
            r#"
[server]
bind_addr = "0.0.0.0:9100"
operation_timeout_ms = 250
log_level = "debug"

[database]
url = "postgres://localhost/taskboard"
max_pool_size = 4
"#,
        );

        let config =
            ServerConfig::resolve(&ServerCliArgs::default(), &file).expect("valid config");

        assert_eq!(config.bind_addr, "0.0.0.0:9100");
        assert_eq!(config.operation_timeout, Duration::from_millis(250));
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/taskboard")
        );
        assert_eq!(config.max_pool_size, 4);
        assert_eq!(config.log_level, "debug");
    }

    #[rstest]
    fn cli_overrides_file() {
        let file = parse(
            r#"
[server]
bind_addr = "0.0.0.0:9100"
log_level = "warn"

[database]
max_pool_size = 4
"#,
        );
        let cli = ServerCliArgs {
            bind: Some("127.0.0.1:3000".to_owned()),
            log_level: Some("trace".to_owned()),
            ..ServerCliArgs::default()
        };

        let config = ServerConfig::resolve(&cli, &file).expect("valid config");

        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.max_pool_size, 4);
    }

    #[rstest]
    #[case("[database]\nmax_pool_size = 0", "max_pool_size")]
    #[case("[server]\noperation_timeout_ms = 0", "operation_timeout_ms")]
    fn zero_limits_are_rejected(#[case] toml_text: &str, #[case] expected_field: &str) {
        let result = ServerConfig::resolve(&ServerCliArgs::default(), &parse(toml_text));

        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field, .. }) if field == expected_field
        ));
    }

    #[rstest]
    fn explicit_missing_config_file_is_an_error() {
        let result = load_config_file(Some(Path::new("/nonexistent/taskboard.toml")));

        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
