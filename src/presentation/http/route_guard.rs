use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::application::route_guard::{GuardDecision, decide, is_excluded};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::session_user;

/// Wraps the whole router: redirects by session state, otherwise passes the
/// request through untouched.
pub async fn route_guard(State(ctx): State<AppContext>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    if is_excluded(&path) {
        return next.run(req).await;
    }
    let has_session = session_user(&ctx.cfg, req.headers()).is_some();
    match decide(&path, has_session) {
        GuardDecision::Pass => next.run(req).await,
        GuardDecision::Redirect(location) => {
            tracing::debug!(path = %path, location = %location, "route_guard_redirect");
            Redirect::temporary(&location).into_response()
        }
    }
}
