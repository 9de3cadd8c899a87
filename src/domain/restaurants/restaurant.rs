#[derive(Debug, Clone)]
pub struct Restaurant {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
