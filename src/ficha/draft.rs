//! Draft persistence.
//!
//! A draft is a locally persisted, *unvalidated* snapshot of one screen's
//! in-progress data: one key per screen type, overwritten on every change,
//! deleted on submit. [`DraftService`] is schema-agnostic — it moves opaque
//! JSON blobs and knows nothing of field kinds, dates, or record arrays;
//! re-typing what comes back is the caller's job (see `session`).
//!
//! Nothing here ever fails outward. Saving is best-effort (a lost write is
//! superseded by the next change's save) and a corrupted stored blob reads
//! as "no draft": falling back to defaults beats crashing the restore path.

use crate::store::{KeyValueStore, SafeStore};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Builds the storage key for a screen's single draft.
pub fn draft_key(screen: &str) -> String {
    format!("@draft_{}", screen)
}

/// Key for a screen type that represents multiple logical subjects (the
/// cleaning log is one draft *per area*). The subject is sanitized the way
/// the screens do it: whitespace runs become `_`.
pub fn draft_key_for(screen: &str, subject: &str) -> String {
    let subject = subject.split_whitespace().collect::<Vec<_>>().join("_");
    format!("@draft_{}_{}", screen, subject)
}

pub struct DraftService<S> {
    store: SafeStore<S>,
}

impl<S: KeyValueStore> DraftService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: SafeStore::new(store),
        }
    }

    /// Serializes `data` and stores it under `key`, silently.
    ///
    /// A value that will not serialize is logged and dropped; the previous
    /// draft, if any, stays in place.
    pub async fn save_draft<T: Serialize>(&self, key: &str, data: &T) {
        match serde_json::to_string(data) {
            Ok(blob) => self.store.set(key, &blob).await,
            Err(error) => {
                tracing::warn!(key, %error, "draft not serializable; skipping save");
            }
        }
    }

    /// Fetches and deserializes the draft under `key`.
    ///
    /// Absent, corrupted, and shape-incompatible blobs all come back as
    /// `None` (logged where there was something to log).
    pub async fn get_draft<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let blob = self.store.get(key).await?;
        match serde_json::from_str(&blob) {
            Ok(data) => Some(data),
            Err(error) => {
                tracing::warn!(key, %error, "stored draft unreadable; treating as absent");
                None
            }
        }
    }

    /// Deletes the draft under `key`. Used once the official record is
    /// submitted.
    pub async fn clear_draft(&self, key: &str) {
        self.store.remove(key).await;
    }
}
