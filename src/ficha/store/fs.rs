use super::KeyValueStore;
use crate::error::{FichaError, Result};
use async_trait::async_trait;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage: one file per key under a root directory.
///
/// Keys are arbitrary strings (`@draft_cleaning_Área_de_Produção`), so the
/// filename keeps only filesystem-safe characters and replaces the rest.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The per-user platform data directory, the device-scoped location
    /// drafts are expected to survive restarts in.
    pub fn at_default_root() -> Result<Self> {
        let dirs = ProjectDirs::from("br", "agrolabs", "ficha")
            .ok_or_else(|| FichaError::Store("could not determine data directory".to_string()))?;
        Ok(Self::new(dirs.data_dir()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
                _ => '_',
            })
            .collect();
        self.root.join(format!("{}.json", safe))
    }

    async fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).await.map_err(FichaError::Io)?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_root().await?;
        fs::write(self.entry_path(key), value)
            .await
            .map_err(FichaError::Io)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.entry_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FichaError::Io(e)),
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FichaError::Io(e)),
        }
    }
}
