use async_trait::async_trait;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Single-shot, non-resumable write.
    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str)
    -> anyhow::Result<()>;
    /// Idempotent: deleting a missing object is not an error.
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
    fn public_url(&self, key: &str) -> String;
}
