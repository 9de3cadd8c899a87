use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;

pub const UNAUTHORIZED_MESSAGE: &str = "Não autorizado";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Signs a session token for `user_id`. Sessions are issued by the auth
/// provider; this is its counterpart of `validate_token`.
pub fn issue_session_token(cfg: &Config, user_id: &str, ttl_secs: i64) -> anyhow::Result<String> {
    let exp = chrono::Utc::now().timestamp() + ttl_secs;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: exp.max(0) as usize,
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret_pem.as_bytes()),
    )?;
    Ok(token)
}

pub fn validate_token(cfg: &Config, token: &str) -> Result<String, StatusCode> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret_pem.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;
    if data.claims.sub.trim().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(data.claims.sub)
}

/// Authorization header first, then the HttpOnly `access_token` cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(t) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
    {
        return Some(t.to_string());
    }
    headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookie_hdr| get_cookie(cookie_hdr, "access_token"))
}

fn get_cookie(cookie_hdr: &str, name: &str) -> Option<String> {
    for part in cookie_hdr.split(';') {
        if let Some((k, v)) = part.trim().split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

/// User id carried by a valid session token.
pub fn session_user(cfg: &Config, headers: &HeaderMap) -> Option<String> {
    token_from_headers(headers).and_then(|t| validate_token(cfg, &t).ok())
}

/// Current user; rejects with 401 when there is no valid session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
}

#[axum::async_trait]
impl FromRequestParts<AppContext> for Session {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        session_user(&ctx.cfg, &parts.headers)
            .map(|user_id| Session { user_id })
            .ok_or((StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE))
    }
}
