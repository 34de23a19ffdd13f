//! Client-side auth session persisted across reloads.

use std::sync::Mutex;

use dispatch_core::{AuthResponse, User};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "authToken";
/// Storage key of the signed-in user.
pub const USER_KEY: &str = "user";

/// Session storage errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
    #[error("stored session is corrupt: {0}")]
    Corrupt(String),
}

/// What survives a reload: the token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

/// Where the session is kept.
pub trait SessionStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError>;
    fn save(&self, session: &StoredSession) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-process store, used off the browser and in tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<StoredSession>>, SessionError> {
        self.session
            .lock()
            .map_err(|e| SessionError::Unavailable(e.to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        *self.slot()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot()? = None;
        Ok(())
    }
}

/// `localStorage` store under the `authToken` and `user` keys.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSessionStore;

#[cfg(target_arch = "wasm32")]
impl SessionStore for BrowserSessionStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        use gloo_storage::errors::StorageError;
        use gloo_storage::{LocalStorage, Storage};

        let token: String = match LocalStorage::get(TOKEN_KEY) {
            Ok(token) => token,
            Err(StorageError::KeyNotFound(_)) => return Ok(None),
            Err(StorageError::SerdeError(e)) => return Err(SessionError::Corrupt(e.to_string())),
            Err(e) => return Err(SessionError::Unavailable(e.to_string())),
        };
        let user: User = match LocalStorage::get(USER_KEY) {
            Ok(user) => user,
            Err(StorageError::KeyNotFound(_)) => return Ok(None),
            Err(StorageError::SerdeError(e)) => return Err(SessionError::Corrupt(e.to_string())),
            Err(e) => return Err(SessionError::Unavailable(e.to_string())),
        };
        Ok(Some(StoredSession { token, user }))
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        use gloo_storage::{LocalStorage, Storage};

        LocalStorage::set(TOKEN_KEY, &session.token)
            .and_then(|_| LocalStorage::set(USER_KEY, &session.user))
            .map_err(|e| SessionError::Unavailable(e.to_string()))
    }

    fn clear(&self) -> Result<(), SessionError> {
        use gloo_storage::{LocalStorage, Storage};

        LocalStorage::delete(TOKEN_KEY);
        LocalStorage::delete(USER_KEY);
        Ok(())
    }
}

/// Store used by the app on the current target.
#[cfg(target_arch = "wasm32")]
pub type DefaultSessionStore = BrowserSessionStore;
#[cfg(not(target_arch = "wasm32"))]
pub type DefaultSessionStore = MemorySessionStore;

/// The signed-in user, mirrored to a [`SessionStore`].
#[derive(Debug)]
pub struct AuthSession<S> {
    store: S,
    current: Option<StoredSession>,
}

impl<S: SessionStore> AuthSession<S> {
    /// Restore whatever the store holds. Unreadable data is cleared.
    pub fn restore(store: S) -> Self {
        let current = match store.load() {
            Ok(current) => current,
            Err(e) => {
                tracing::error!("Error checking authentication: {}", e);
                if let Err(e) = store.clear() {
                    tracing::warn!("Failed to clear session: {}", e);
                }
                None
            }
        };
        Self { store, current }
    }

    /// Keep the token and user from a successful login.
    ///
    /// Returns whether the session is now authenticated. Responses without
    /// both a token and a user leave the session untouched.
    pub fn record_login(&mut self, response: &AuthResponse) -> Result<bool, SessionError> {
        let (true, Some(token), Some(user)) =
            (response.success, response.token.as_ref(), response.user.as_ref())
        else {
            return Ok(false);
        };

        let session = StoredSession {
            token: token.clone(),
            user: user.clone(),
        };
        self.store.save(&session)?;
        self.current = Some(session);
        Ok(true)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    /// Forget the token and the user.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.current = None;
        self.store.clear()
    }
}
