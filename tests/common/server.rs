//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own store file.

use super::constants::*;
use super::fixtures::test_spots;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use video_catalog_server::oidc::{IdentityClaim, SessionStore, SessionToken};
use video_catalog_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use video_catalog_server::{Catalog, JsonFileVideoStore, SqliteVideoStore, VideoStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestBackend {
    Sqlite,
    Json,
}

/// Test server instance with an isolated, pre-seeded store
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Path of the backing file (SQLite database or JSON document)
    pub store_path: PathBuf,

    /// Session store shared with the server, for injecting logins
    pub session_store: Arc<SessionStore>,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns an open (no login required) server over SQLite
    pub async fn spawn() -> Self {
        Self::spawn_with(TestBackend::Sqlite, false).await
    }

    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Creates the store file in a temporary directory
    /// 2. Seeds it with the fixture spots
    /// 3. Binds to a random port (127.0.0.1:0)
    /// 4. Spawns the server in a background task
    /// 5. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if any of the steps above fails.
    pub async fn spawn_with(backend: TestBackend, require_login: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let (store_path, store): (PathBuf, Arc<dyn VideoStore>) = match backend {
            TestBackend::Sqlite => {
                let path = temp_dir.path().join("spots.db");
                let store = SqliteVideoStore::new(&path).expect("Failed to open SQLite store");
                (path, Arc::new(store))
            }
            TestBackend::Json => {
                let path = temp_dir.path().join("spots.json");
                let store = JsonFileVideoStore::new(&path).expect("Failed to open JSON store");
                (path, Arc::new(store))
            }
        };

        let catalog = Arc::new(Catalog::new(store));
        let seeded = catalog
            .seed_if_empty(test_spots())
            .expect("Failed to seed fixture spots");
        assert_eq!(seeded, FIXTURE_SPOTS_COUNT);

        let session_store = Arc::new(SessionStore::new());

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            require_login,
            ..Default::default()
        };

        let app = make_app(config, catalog, session_store.clone(), None)
            .await
            .expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            store_path,
            session_store,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Registers `TEST_SESSION_TOKEN` as a logged-in session, skipping the
    /// identity provider round trip.
    pub async fn login_session(&self) -> &'static str {
        self.session_store
            .insert(
                SessionToken(TEST_SESSION_TOKEN.to_string()),
                IdentityClaim {
                    subject: TEST_USER_SUBJECT.to_string(),
                    email: None,
                    preferred_username: Some(TEST_USER_NAME.to_string()),
                },
            )
            .await;
        TEST_SESSION_TOKEN
    }

    /// Waits for the server to become ready by polling the stats page
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
