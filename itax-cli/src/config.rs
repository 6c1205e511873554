//! Runtime settings for the `itax` binary.
//!
//! Each value is taken from the first source that sets it:
//!
//! 1. command-line flag
//! 2. environment variable (`ITAX_DB_BACKEND`, `ITAX_DATABASE_URL`, `ITAX_LOG_FILE`)
//! 3. TOML file (`--config <path>`, else `./itax.toml` when it exists)
//! 4. built-in default
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "sqlite:itax.db?mode=rwc"
//!
//! [logging]
//! level = "info"
//! file = "itax.log"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itax_core::db::DbConfig;
use serde::Deserialize;

use crate::cli::Cli;

pub const DEFAULT_CONFIG_FILE: &str = "itax.toml";
pub const DEFAULT_BACKEND: &str = "sqlite";
pub const DEFAULT_CONNECTION_STRING: &str = "sqlite:itax.db?mode=rwc";

pub const ENV_DB_BACKEND: &str = "ITAX_DB_BACKEND";
pub const ENV_DATABASE_URL: &str = "ITAX_DATABASE_URL";
pub const ENV_LOG_FILE: &str = "ITAX_LOG_FILE";

/// Contents of the TOML configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub database: DatabaseSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSection {
    pub backend: Option<String>,
    pub connection_string: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Any `EnvFilter` directive. `RUST_LOG` takes precedence.
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub db: DbConfig,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Parses a TOML configuration file.
pub fn load_from_file(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Loads the configuration file (if any) and layers the process
/// environment and `cli` over it.
pub fn load(cli: &Cli) -> Result<Settings> {
    let file = match &cli.config {
        Some(path) => load_from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            load_from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => FileConfig::default(),
    };

    Ok(resolve(cli, |key| std::env::var(key).ok(), file))
}

/// Combines the three sources. `env` looks up one variable; empty values
/// count as unset.
pub fn resolve(
    cli: &Cli,
    env: impl Fn(&str) -> Option<String>,
    file: FileConfig,
) -> Settings {
    let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    let backend = cli
        .backend
        .clone()
        .or_else(|| env(ENV_DB_BACKEND))
        .or(file.database.backend)
        .unwrap_or_else(|| DEFAULT_BACKEND.to_string());

    let connection_string = cli
        .db
        .clone()
        .or_else(|| env(ENV_DATABASE_URL))
        .or(file.database.connection_string)
        .unwrap_or_else(|| DEFAULT_CONNECTION_STRING.to_string());

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env(ENV_LOG_FILE).map(PathBuf::from))
        .or(file.logging.file);

    Settings {
        db: DbConfig {
            backend,
            connection_string,
        },
        log_level: file.logging.level,
        log_file,
    }
}
