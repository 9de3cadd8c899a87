pub mod files_repository_sqlx;
pub mod restaurant_repository_sqlx;
