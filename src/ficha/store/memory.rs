use super::KeyValueStore;
use crate::error::{FichaError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-memory storage for tests. No persistence.
///
/// `fail_next_operations(true)` makes every subsequent operation fail,
/// which is how the swallow-and-log policy upstream gets exercised.
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_operations(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FichaError::Store("injected storage failure".to_string()));
        }
        self.entries
            .lock()
            .map_err(|_| FichaError::Store("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove_round_trip() {
        let store = InMemoryStore::new();
        store.set("@draft_water_quality", "{}").await.unwrap();
        assert_eq!(
            store.get("@draft_water_quality").await.unwrap().as_deref(),
            Some("{}")
        );

        store.remove("@draft_water_quality").await.unwrap();
        assert_eq!(store.get("@draft_water_quality").await.unwrap(), None);
    }

    #[tokio::test]
    async fn removing_an_absent_key_is_fine() {
        let store = InMemoryStore::new();
        assert!(store.remove("never_set").await.is_ok());
    }

    #[tokio::test]
    async fn failure_injection_covers_all_operations() {
        let store = InMemoryStore::new();
        store.fail_next_operations(true);
        assert!(store.set("k", "v").await.is_err());
        assert!(store.get("k").await.is_err());
        assert!(store.remove("k").await.is_err());

        store.fail_next_operations(false);
        assert!(store.set("k", "v").await.is_ok());
    }
}
