use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;

use crate::application::ports::object_storage::ObjectStorage;
use crate::infrastructure::storage::key_to_path;

/// Local-disk bucket for development. Objects are served by the HTTP layer
/// under `/public/files`.
pub struct FsObjectStorage {
    pub root: PathBuf,
    pub public_origin: Option<String>,
}

impl FsObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_origin: Option<String>) -> Self {
        Self {
            root: root.into(),
            public_origin,
        }
    }
}

#[async_trait]
impl ObjectStorage for FsObjectStorage {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> anyhow::Result<()> {
        let path = key_to_path(&self.root, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        let path = key_to_path(&self.root, key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to delete {}", path.display())),
        }
    }

    fn public_url(&self, key: &str) -> String {
        let origin = self.public_origin.as_deref().unwrap_or("");
        format!("{}/public/files/{}", origin.trim_end_matches('/'), key)
    }
}
