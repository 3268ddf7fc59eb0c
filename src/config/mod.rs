mod file_config;

pub use file_config::{FileConfig, OidcConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub backend: StorageBackend,
    pub db_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub seed_path: Option<PathBuf>,
    pub port: u16,
    pub bind_address: String,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub api_docs_path: Option<PathBuf>,
    pub require_login: bool,
}

/// Where the records live, with the path the chosen backend needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageSettings {
    Sqlite { db_path: PathBuf },
    Json { json_path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageSettings,
    pub seed_path: Option<PathBuf>,
    pub port: u16,
    pub bind_address: String,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub api_docs_path: Option<PathBuf>,
    pub require_login: bool,
    pub oidc: Option<OidcConfig>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let backend = match file.backend {
            Some(raw) => StorageBackend::from_str(&raw, true)
                .map_err(|_| anyhow!("Unknown storage backend in config file: {}", raw))?,
            None => cli.backend,
        };

        let storage = match backend {
            StorageBackend::Sqlite => StorageSettings::Sqlite {
                db_path: file
                    .db_path
                    .map(PathBuf::from)
                    .or_else(|| cli.db_path.clone())
                    .ok_or_else(|| {
                        anyhow!("db_path must be specified via --db-path or in config file")
                    })?,
            },
            StorageBackend::Json => StorageSettings::Json {
                json_path: file
                    .json_path
                    .map(PathBuf::from)
                    .or_else(|| cli.json_path.clone())
                    .ok_or_else(|| {
                        anyhow!("json_path must be specified via --json-path or in config file")
                    })?,
            },
        };

        let seed_path = file
            .seed_path
            .map(PathBuf::from)
            .or_else(|| cli.seed_path.clone());
        if let Some(seed_path) = &seed_path {
            if !seed_path.is_file() {
                bail!("Seed file does not exist: {:?}", seed_path);
            }
        }

        let port = file.port.unwrap_or(cli.port);
        let bind_address = file
            .bind_address
            .unwrap_or_else(|| cli.bind_address.clone());

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        let api_docs_path = file
            .api_docs_path
            .map(PathBuf::from)
            .or_else(|| cli.api_docs_path.clone());

        let require_login = file.require_login.unwrap_or(cli.require_login);
        let oidc = file.oidc;
        if require_login && oidc.is_none() {
            bail!("require_login needs an [oidc] section in the config file");
        }

        Ok(Self {
            storage,
            seed_path,
            port,
            bind_address,
            logging_level,
            frontend_dir_path,
            api_docs_path,
            require_login,
            oidc,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
