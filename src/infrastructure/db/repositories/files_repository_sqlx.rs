use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::files_repository::FilesRepository;
use crate::domain::files::restaurant_file::{NewRestaurantFile, RestaurantFile};
use crate::infrastructure::db::PgPool;

pub struct SqlxFilesRepository {
    pub pool: PgPool,
}

impl SqlxFilesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_file(r: &PgRow) -> RestaurantFile {
    RestaurantFile {
        id: r.get("id"),
        name: r.get("name"),
        size: r.get("size"),
        content_type: r.get("type"),
        url: r.get("url"),
        restaurant_id: r.get("restaurant_id"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl FilesRepository for SqlxFilesRepository {
    async fn list_for_restaurant(
        &self,
        restaurant_id: &str,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<RestaurantFile>> {
        // LIMIT NULL means no limit
        let rows = sqlx::query(
            r#"SELECT id, name, size, type, url, restaurant_id, created_at
               FROM restaurant_files
               WHERE restaurant_id = $1
               ORDER BY created_at DESC
               LIMIT $2"#,
        )
        .bind(restaurant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_file).collect())
    }

    async fn total_bytes_for_owner(&self, user_id: &str) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COALESCE(SUM(f.size), 0)::BIGINT
               FROM restaurant_files f JOIN restaurants r ON f.restaurant_id = r.id
               WHERE r.user_id = $1"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn insert_file(&self, file: &NewRestaurantFile) -> anyhow::Result<RestaurantFile> {
        let row = sqlx::query(
            r#"INSERT INTO restaurant_files (name, size, type, url, restaurant_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, name, size, type, url, restaurant_id, created_at"#,
        )
        .bind(&file.name)
        .bind(file.size)
        .bind(&file.content_type)
        .bind(&file.url)
        .bind(&file.restaurant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_file(&row))
    }
}
