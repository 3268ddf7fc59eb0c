use super::RequestsLoggingLevel;
use std::path::PathBuf;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub bind_address: String,
    pub frontend_dir_path: Option<String>,
    /// Served at `/api/docs` instead of the bundled API description.
    pub api_docs_path: Option<PathBuf>,
    /// If true, mutations and downloads need a logged-in session.
    pub require_login: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            bind_address: "127.0.0.1".to_string(),
            frontend_dir_path: None,
            api_docs_path: None,
            require_login: false,
        }
    }
}
