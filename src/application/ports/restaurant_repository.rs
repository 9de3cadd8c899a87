use async_trait::async_trait;

use crate::domain::restaurants::restaurant::Restaurant;

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Resolves a restaurant only when it belongs to `user_id`.
    async fn find_owned(&self, id: &str, user_id: &str) -> anyhow::Result<Option<Restaurant>>;
}
