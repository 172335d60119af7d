//! Read-only access to the persisted bearer token.
//!
//! The header builder only ever reads from a [`TokenStore`]; writing the token
//! is the responsibility of whatever login flow owns it.

use keyring::Entry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Key under which the token is persisted.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Keyring service name.
pub const KEYRING_SERVICE: &str = "gamepath-ai";
/// Environment variable consulted by [`EnvTokenStore`].
pub const AUTH_TOKEN_ENV: &str = "GAMEPATH_AUTH_TOKEN";

/// Source of the persisted authentication token.
pub trait TokenStore: Send + Sync {
    /// Current token, if one is stored. Empty strings count as absent.
    fn token(&self) -> Option<String>;
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Store that never holds a token.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTokenStore;

impl TokenStore for NoTokenStore {
    fn token(&self) -> Option<String> {
        None
    }
}

/// Fixed token, mostly useful for tests and short-lived tools.
#[derive(Debug, Clone)]
pub struct StaticTokenStore {
    token: Option<String>,
}

impl StaticTokenStore {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: non_empty(token.into()),
        }
    }
}

impl TokenStore for StaticTokenStore {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvTokenStore {
    var: String,
}

impl EnvTokenStore {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenStore {
    fn default() -> Self {
        Self::new(AUTH_TOKEN_ENV)
    }
}

impl TokenStore for EnvTokenStore {
    fn token(&self) -> Option<String> {
        std::env::var(&self.var).ok().and_then(non_empty)
    }
}

/// Flat JSON key/value file, the desktop equivalent of browser local storage.
///
/// The file is re-read on every call so a token written by another process is
/// picked up without restarting.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: AUTH_TOKEN_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "token file not readable");
                return None;
            }
        };
        let map: HashMap<String, serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "token file is not a JSON object");
                return None;
            }
        };
        map.get(&self.key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .and_then(non_empty)
    }
}

/// OS keyring entry (`gamepath-ai` / `auth_token` by default).
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
    user: String,
}

impl KeyringTokenStore {
    pub fn new(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE, AUTH_TOKEN_KEY)
    }
}

impl TokenStore for KeyringTokenStore {
    fn token(&self) -> Option<String> {
        let entry = Entry::new(&self.service, &self.user).ok()?;
        entry.get_password().ok().and_then(non_empty)
    }
}

/// Tries each store in order and returns the first token found.
#[derive(Clone, Default)]
pub struct ChainTokenStore {
    stores: Vec<Arc<dyn TokenStore>>,
}

impl ChainTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.stores.push(store);
        self
    }
}

impl TokenStore for ChainTokenStore {
    fn token(&self) -> Option<String> {
        self.stores.iter().find_map(|s| s.token())
    }
}

/// Keyring first, then the `GAMEPATH_AUTH_TOKEN` environment variable.
pub fn default_token_store() -> Arc<dyn TokenStore> {
    Arc::new(
        ChainTokenStore::new()
            .with(Arc::new(KeyringTokenStore::default()))
            .with(Arc::new(EnvTokenStore::default())),
    )
}
