use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;

const SESSION_TOKEN_LENGTH: usize = 64;

/// Who the identity provider says the caller is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityClaim {
    pub subject: String,
    pub email: Option<String>,
    pub preferred_username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(pub String);

impl SessionToken {
    /// A random A-z0-9 string
    pub fn generate() -> SessionToken {
        let rng = rand::rng();
        let random_string: String = rng
            .sample_iter(&Alphanumeric)
            .take(SESSION_TOKEN_LENGTH)
            .map(char::from)
            .collect();
        SessionToken(random_string)
    }
}

/// Opaque session tokens issued after a successful login. In memory only,
/// so sessions do not survive a restart.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, IdentityClaim>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, identity: IdentityClaim) -> SessionToken {
        let token = SessionToken::generate();
        self.insert(token.clone(), identity).await;
        token
    }

    pub async fn insert(&self, token: SessionToken, identity: IdentityClaim) {
        self.sessions.write().await.insert(token.0, identity);
    }

    pub async fn get(&self, token: &str) -> Option<IdentityClaim> {
        self.sessions.read().await.get(token).cloned()
    }

    pub async fn close(&self, token: &str) -> Option<IdentityClaim> {
        self.sessions.write().await.remove(token)
    }
}
