// freight-client/src/session.rs
// Session credential: one bearer token, persisted in a credential store

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use serde::{Deserialize, Serialize};

use crate::ClientResult;

/// Durable home of the bearer token
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Load the stored token, if any
    fn load(&self) -> Option<String>;

    /// Persist the token, replacing any previous one
    fn save(&self, token: &str) -> std::io::Result<()>;

    /// Remove the stored token
    fn clear(&self) -> std::io::Result<()>;
}

/// Token held in memory only; gone when the process exits
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// On-disk credential record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    token: String,
    /// Unix seconds
    saved_at: u64,
}

/// Token persisted as a JSON file
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        let json = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<StoredCredential>(&json) {
            Ok(stored) if !stored.token.is_empty() => Some(stored.token),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable credential file");
                None
            }
        }
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        self.ensure_dir()?;
        let stored = StoredCredential {
            token: token.to_string(),
            saved_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, json)
    }

    fn clear(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Host callback run when the server rejects the session
pub type AuthFailureHook = Arc<dyn Fn() + Send + Sync>;

/// Token attached to one outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Credential {
    pub token: String,
    /// Sign-in generation the token belongs to
    pub generation: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    generation: u64,
}

struct SessionInner {
    store: Box<dyn CredentialStore>,
    state: Mutex<SessionState>,
    on_auth_failure: RwLock<Option<AuthFailureHook>>,
}

/// Session context shared by every request of one client
///
/// Cloning is cheap; all clones see the same token. The token is read from
/// the store once, at construction, and written through on every change.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Session backed by `store`, resuming any token it already holds
    pub fn new(store: impl CredentialStore + 'static) -> Self {
        let token = store.load();
        Self {
            inner: Arc::new(SessionInner {
                store: Box::new(store),
                state: Mutex::new(SessionState {
                    token,
                    generation: 0,
                }),
                on_auth_failure: RwLock::new(None),
            }),
        }
    }

    /// Session that forgets its token when the process exits
    pub fn in_memory() -> Self {
        Self::new(MemoryCredentialStore::new())
    }

    /// Register the callback fired when the server rejects the session
    ///
    /// Replaces the previous callback. The host typically drops all
    /// in-memory state and returns to its login screen.
    pub fn set_on_auth_failure(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self
            .inner
            .on_auth_failure
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(hook));
    }

    /// Builder-style variant of [`Session::set_on_auth_failure`]
    pub fn with_on_auth_failure(self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.set_on_auth_failure(hook);
        self
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current bearer token
    pub fn token(&self) -> Option<String> {
        self.state().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().token.is_some()
    }

    pub(crate) fn credential(&self) -> Option<Credential> {
        let state = self.state();
        state.token.as_ref().map(|token| Credential {
            token: token.clone(),
            generation: state.generation,
        })
    }

    /// Store a fresh token (login)
    pub fn sign_in(&self, token: impl Into<String>) -> ClientResult<()> {
        let token = token.into();
        // Store I/O happens under the state lock so it cannot interleave
        // with a concurrent teardown
        let mut state = self.state();
        self.inner.store.save(&token)?;
        state.token = Some(token);
        state.generation += 1;
        Ok(())
    }

    /// Drop the token (logout); the auth-failure callback is not fired
    pub fn sign_out(&self) -> ClientResult<()> {
        let mut state = self.state();
        state.token = None;
        self.inner.store.clear()?;
        Ok(())
    }

    /// Tear the session down after the server rejected `generation`
    ///
    /// Returns `true` only for the call that actually tore it down: later
    /// rejections of the same generation, and rejections of a token that
    /// has since been replaced, are no-ops.
    pub(crate) fn invalidate(&self, generation: u64) -> bool {
        {
            let mut state = self.state();
            if state.token.is_none() || state.generation != generation {
                return false;
            }
            state.token = None;
            if let Err(e) = self.inner.store.clear() {
                tracing::error!(error = %e, "Failed to clear stored credential");
            }
        }

        let hook = self
            .inner
            .on_auth_failure
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(hook) = hook {
            hook();
        }
        true
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Session")
            .field("store", &self.inner.store)
            .field("authenticated", &state.token.is_some())
            .field("generation", &state.generation)
            .finish()
    }
}
