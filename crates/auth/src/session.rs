//! Signed-in user state, persisted through a key/value session store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

use transerp_core::UserId;

/// Store key holding the signed-in user name.
pub const USER_NAME_KEY: &str = "userName";
/// Store key holding the signed-in user id.
pub const USER_ID_KEY: &str = "userId";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session store error: {0}")]
    Store(String),

    #[error("malformed session value under '{key}'")]
    Malformed { key: String },

    #[error("user name must not be blank")]
    BlankUserName,
}

/// Browser-style key/value storage for the session.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, SessionError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), SessionError>;
    async fn delete(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedSession {
    pub user_id: UserId,
    pub username: String,
    pub authenticated: bool,
}

/// Explicit handle on the current session.
///
/// Every change is published on a watch channel so navigation and pages can
/// refresh; see [`subscribe`](Self::subscribe).
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    state: watch::Sender<Option<AuthenticatedSession>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(None);
        Self { store, state }
    }

    pub fn current(&self) -> Option<AuthenticatedSession> {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().as_ref().is_some_and(|s| s.authenticated)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AuthenticatedSession>> {
        self.state.subscribe()
    }

    /// Rebuild the session from the store.
    ///
    /// Any store failure or a missing/blank user name means "not signed in";
    /// the error is logged, never returned.
    pub async fn restore(&self) -> bool {
        match self.read_stored().await {
            Ok(Some(session)) => {
                tracing::debug!(user_id = %session.user_id, "session restored");
                self.state.send_replace(Some(session));
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(error = %err, "session restore failed");
                false
            }
        }
    }

    async fn read_stored(&self) -> Result<Option<AuthenticatedSession>, SessionError> {
        let username = match self.store.get(USER_NAME_KEY).await? {
            Some(Value::String(name)) if !name.trim().is_empty() => name,
            Some(Value::String(_)) | None => return Ok(None),
            Some(_) => {
                return Err(SessionError::Malformed {
                    key: USER_NAME_KEY.to_string(),
                })
            }
        };

        // A missing or unreadable id still signs the user in, as user 0.
        let user_id = match self.store.get(USER_ID_KEY).await {
            Ok(Some(value)) => parse_user_id(&value).unwrap_or_default(),
            _ => UserId::default(),
        };

        Ok(Some(AuthenticatedSession {
            user_id,
            username,
            authenticated: true,
        }))
    }

    /// Record a successful login and notify subscribers.
    pub async fn sign_in(
        &self,
        user_id: UserId,
        username: impl Into<String>,
    ) -> Result<AuthenticatedSession, SessionError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(SessionError::BlankUserName);
        }

        self.store
            .set(USER_NAME_KEY, Value::String(username.clone()))
            .await?;
        self.store
            .set(USER_ID_KEY, Value::from(user_id.get()))
            .await?;

        let session = AuthenticatedSession {
            user_id,
            username,
            authenticated: true,
        };
        tracing::info!(user_id = %user_id, username = %session.username, "signed in");
        self.state.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Clear the session. Subscribers are notified even if the store fails.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        let previous = self.state.send_replace(None);
        if let Some(session) = previous {
            tracing::info!(user_id = %session.user_id, "signed out");
        }

        let name = self.store.delete(USER_NAME_KEY).await;
        let id = self.store.delete(USER_ID_KEY).await;
        name.and(id)
    }
}

fn parse_user_id(value: &Value) -> Option<UserId> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()).map(UserId::new),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        values: Mutex<HashMap<String, Value>>,
        broken: bool,
    }

    #[async_trait::async_trait]
    impl SessionStore for MapStore {
        async fn get(&self, key: &str) -> Result<Option<Value>, SessionError> {
            if self.broken {
                return Err(SessionError::Store("storage not available".into()));
            }
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: Value) -> Result<(), SessionError> {
            self.values.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), SessionError> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn sign_in_persists_and_restores() {
        let store = Arc::new(MapStore::default());
        let manager = SessionManager::new(store.clone());
        manager.sign_in(UserId::new(12), "dispatch").await.unwrap();

        let fresh = SessionManager::new(store);
        assert!(fresh.restore().await);
        let session = fresh.current().unwrap();
        assert_eq!(session.user_id, UserId::new(12));
        assert_eq!(session.username, "dispatch");
    }

    #[tokio::test]
    async fn broken_store_means_signed_out() {
        let manager = SessionManager::new(Arc::new(MapStore {
            broken: true,
            ..MapStore::default()
        }));
        assert!(!manager.restore().await);
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn string_user_id_is_accepted() {
        let store = Arc::new(MapStore::default());
        store.set(USER_NAME_KEY, Value::from("ops")).await.unwrap();
        store.set(USER_ID_KEY, Value::from("7")).await.unwrap();
        let manager = SessionManager::new(store);
        assert!(manager.restore().await);
        assert_eq!(manager.current().unwrap().user_id, UserId::new(7));
    }

    #[tokio::test]
    async fn subscribers_see_sign_in_and_out() {
        let manager = SessionManager::new(Arc::new(MapStore::default()));
        let mut rx = manager.subscribe();

        manager.sign_in(UserId::new(1), "admin").await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        manager.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let manager = SessionManager::new(Arc::new(MapStore::default()));
        assert_eq!(
            manager.sign_in(UserId::new(1), "  ").await.unwrap_err(),
            SessionError::BlankUserName
        );
    }
}
