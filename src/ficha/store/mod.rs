//! # Storage Layer
//!
//! Durable, string-keyed, string-valued storage for drafts, abstracted
//! behind the [`KeyValueStore`] trait so the core never touches a concrete
//! backend:
//!
//! - [`fs::FileStore`]: production storage, one file per key under a root
//!   directory (platform data dir by default).
//! - [`memory::InMemoryStore`]: in-memory storage for tests, with failure
//!   injection so the error policy itself is testable.
//!
//! Backends report failures as ordinary `Result`s. [`SafeStore`] is the
//! failure boundary on top: draft autosave is a best-effort convenience,
//! so every storage failure is logged and converted to a benign outcome —
//! absent on read, no-op on write — and nothing above this wrapper ever
//! sees a storage error. Losing one autosave write must never be
//! user-visible; the next change's save supersedes it.

use crate::error::Result;
use async_trait::async_trait;

pub mod fs;
pub mod memory;

/// Abstract interface for durable draft storage.
///
/// All operations are asynchronous and may suspend the calling flow; none
/// may block the caller's thread.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Fetch the value under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Delete the value under `key`. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

// Shared handles are stores too; lets a session and a test (or two
// screens) hold the same backend.
#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}

/// Failure-swallowing wrapper: converts every storage error into a logged,
/// benign result.
pub struct SafeStore<S> {
    inner: S,
}

impl<S: KeyValueStore> SafeStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub async fn set(&self, key: &str, value: &str) {
        if let Err(error) = self.inner.set(key, value).await {
            tracing::warn!(key, %error, "draft write failed; keeping previous value");
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        match self.inner.get(key).await {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(key, %error, "draft read failed; treating as absent");
                None
            }
        }
    }

    pub async fn remove(&self, key: &str) {
        if let Err(error) = self.inner.remove(key).await {
            tracing::warn!(key, %error, "draft removal failed");
        }
    }
}
