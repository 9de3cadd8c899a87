use async_trait::async_trait;

use crate::domain::files::restaurant_file::{NewRestaurantFile, RestaurantFile};

#[async_trait]
pub trait FilesRepository: Send + Sync {
    /// Newest first, truncated to `limit` when given.
    async fn list_for_restaurant(
        &self,
        restaurant_id: &str,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<RestaurantFile>>;
    /// Byte total across every restaurant owned by `user_id`.
    async fn total_bytes_for_owner(&self, user_id: &str) -> anyhow::Result<i64>;
    async fn insert_file(&self, file: &NewRestaurantFile) -> anyhow::Result<RestaurantFile>;
}
