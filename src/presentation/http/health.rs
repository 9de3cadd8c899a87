use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::infrastructure::db::PgPool;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResp {
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, body = HealthResp))
)]
pub async fn health(State(pool): State<PgPool>) -> Json<HealthResp> {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&pool)
        .await
        .map_err(|e| tracing::warn!(error = ?e, "health_db_check_failed"))
        .is_ok();
    Json(health_body(db_ok))
}

fn health_body(db_ok: bool) -> HealthResp {
    HealthResp {
        status: if db_ok { "ok" } else { "degraded" },
    }
}

pub fn routes(pool: PgPool) -> Router {
    Router::new().route("/health", get(health)).with_state(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_only_status() {
        let ok = serde_json::to_value(health_body(true)).unwrap();
        assert_eq!(ok, serde_json::json!({ "status": "ok" }));
        let degraded = serde_json::to_value(health_body(false)).unwrap();
        assert_eq!(degraded, serde_json::json!({ "status": "degraded" }));
    }
}
