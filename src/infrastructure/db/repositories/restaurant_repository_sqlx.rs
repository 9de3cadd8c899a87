use async_trait::async_trait;
use sqlx::Row;

use crate::application::ports::restaurant_repository::RestaurantRepository;
use crate::domain::restaurants::restaurant::Restaurant;
use crate::infrastructure::db::PgPool;

pub struct SqlxRestaurantRepository {
    pub pool: PgPool,
}

impl SqlxRestaurantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RestaurantRepository for SqlxRestaurantRepository {
    async fn find_owned(&self, id: &str, user_id: &str) -> anyhow::Result<Option<Restaurant>> {
        let row = sqlx::query(
            "SELECT id, user_id, name, created_at FROM restaurants WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| Restaurant {
            id: r.get("id"),
            user_id: r.get("user_id"),
            name: r.get("name"),
            created_at: r.get("created_at"),
        }))
    }
}
