//! Key/value session storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use serde_json::Value;

use transerp_auth::{SessionError, SessionStore};

/// Process-local session store, the stand-in for browser storage.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    values: RwLock<HashMap<String, Value>>,
    unavailable: AtomicBool,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate storage that cannot be reached (e.g. during prerendering).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), SessionError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(SessionError::Store("session storage unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn poisoned() -> SessionError {
    SessionError::Store("lock poisoned".to_string())
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, SessionError> {
        self.check()?;
        let values = self.values.read().map_err(|_| poisoned())?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SessionError> {
        self.check()?;
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SessionError> {
        self.check()?;
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use transerp_auth::{SessionManager, USER_NAME_KEY};
    use transerp_core::UserId;

    #[tokio::test]
    async fn values_round_trip() {
        let store = InMemorySessionStore::new();
        store.set("theme", Value::from("dark")).await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), Some(Value::from("dark")));
        store.delete("theme").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn sign_out_still_clears_state_when_storage_is_gone() {
        let store = Arc::new(InMemorySessionStore::new());
        let manager = SessionManager::new(store.clone());
        manager.sign_in(UserId::new(2), "clerk").await.unwrap();

        store.set_unavailable(true);
        assert!(manager.sign_out().await.is_err());
        assert!(!manager.is_authenticated());

        store.set_unavailable(false);
        assert_eq!(store.get(USER_NAME_KEY).await.unwrap(), Some(Value::from("clerk")));
    }
}
