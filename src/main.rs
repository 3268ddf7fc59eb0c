use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::{
    fmt::Debug,
    path::{Path, PathBuf},
};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use video_catalog_server::config::{AppConfig, CliConfig, FileConfig, StorageBackend, StorageSettings};
use video_catalog_server::{
    export, run_server, Catalog, JsonFileVideoStore, RequestsLoggingLevel, ServerConfig,
    SqliteVideoStore, VideoStore,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Storage backend holding the spots.
    #[clap(long, value_enum, default_value_t = StorageBackend::Sqlite)]
    pub backend: StorageBackend,

    /// Path to the SQLite database file, used by the sqlite backend.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to the JSON document, used by the json backend.
    #[clap(long, value_parser = parse_path)]
    pub json_path: Option<PathBuf>,

    /// JSON array of spots loaded on startup when the store is empty.
    #[clap(long, value_parser = parse_path)]
    pub seed_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    #[clap(long, default_value = "127.0.0.1")]
    pub bind_address: String,

    /// How much of each request to log.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Directory with a static frontend, served in place of the stats page.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// OpenAPI document served at /api/docs instead of the bundled one.
    #[clap(long, value_parser = parse_path)]
    pub api_docs_path: Option<PathBuf>,

    /// Require an OIDC login for mutations and downloads.
    #[clap(long)]
    pub require_login: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            backend: self.backend,
            db_path: self.db_path.clone(),
            json_path: self.json_path.clone(),
            seed_path: self.seed_path.clone(),
            port: self.port,
            bind_address: self.bind_address.clone(),
            logging_level: self.logging_level.clone(),
            frontend_dir_path: self.frontend_dir_path.clone(),
            api_docs_path: self.api_docs_path.clone(),
            require_login: self.require_login,
        }
    }
}

fn open_store(storage: &StorageSettings) -> Result<Arc<dyn VideoStore>> {
    Ok(match storage {
        StorageSettings::Sqlite { db_path } => {
            info!("Opening SQLite spots database at {:?}...", db_path);
            Arc::new(SqliteVideoStore::new(db_path)?)
        }
        StorageSettings::Json { json_path } => {
            info!("Opening JSON spots document at {:?}...", json_path);
            Arc::new(JsonFileVideoStore::new(json_path)?)
        }
    })
}

fn seed_catalog(catalog: &Catalog, seed_path: &Path) -> Result<()> {
    let bytes = std::fs::read(seed_path)
        .with_context(|| format!("Failed to read seed file {:?}", seed_path))?;
    let records = export::parse_json(&bytes)
        .with_context(|| format!("Invalid seed file {:?}", seed_path))?;
    let seeded = catalog.seed_if_empty(records)?;
    if seeded > 0 {
        info!("Loaded {} spots from {:?}", seeded, seed_path);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let catalog = Arc::new(Catalog::new(open_store(&app_config.storage)?));
    if let Some(seed_path) = &app_config.seed_path {
        seed_catalog(&catalog, seed_path)?;
    }

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level,
        port: app_config.port,
        bind_address: app_config.bind_address,
        frontend_dir_path: app_config.frontend_dir_path,
        api_docs_path: app_config.api_docs_path,
        require_login: app_config.require_login,
    };

    info!(
        "Ready to serve {} spots from the {} backend",
        catalog.count()?,
        catalog.backend_name()
    );
    run_server(server_config, catalog, app_config.oidc).await
}
