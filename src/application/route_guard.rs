// Session gate for navigable pages. Pure decision; the axum layer lives in
// presentation::http::route_guard.

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/conta";

const EXCLUDED_PREFIXES: [&str; 5] = [
    "/api",
    "/_next/static",
    "/_next/image",
    "/favicon.ico",
    "/public",
];
const AUTH_PAGE_PREFIXES: [&str; 2] = ["/login", "/sign-up"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Redirect(String),
}

/// Paths the guard never looks at. Prefix match, so `/apiary` is excluded too.
pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_PREFIXES.iter().any(|p| path.starts_with(p))
}

pub fn is_auth_page(path: &str) -> bool {
    AUTH_PAGE_PREFIXES.iter().any(|p| path.starts_with(p))
}

pub fn login_redirect(callback: &str) -> String {
    // Slashes stay readable in the callback.
    let encoded = urlencoding::encode(callback).replace("%2F", "/");
    format!("{LOGIN_PATH}?callbackUrl={encoded}")
}

pub fn decide(path: &str, has_session: bool) -> GuardDecision {
    if is_excluded(path) {
        return GuardDecision::Pass;
    }
    if is_auth_page(path) {
        return if has_session {
            GuardDecision::Redirect(LANDING_PATH.to_string())
        } else {
            GuardDecision::Pass
        };
    }
    if has_session {
        GuardDecision::Pass
    } else {
        GuardDecision::Redirect(login_redirect(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_in_user_is_sent_away_from_auth_pages() {
        assert_eq!(
            decide("/login", true),
            GuardDecision::Redirect("/conta".into())
        );
        assert_eq!(
            decide("/sign-up", true),
            GuardDecision::Redirect("/conta".into())
        );
    }

    #[test]
    fn anonymous_user_may_open_auth_pages() {
        assert_eq!(decide("/login", false), GuardDecision::Pass);
        assert_eq!(decide("/sign-up/step-2", false), GuardDecision::Pass);
    }

    #[test]
    fn anonymous_user_is_sent_to_login_with_callback() {
        assert_eq!(
            decide("/conta", false),
            GuardDecision::Redirect("/login?callbackUrl=/conta".into())
        );
        assert_eq!(
            decide("/", false),
            GuardDecision::Redirect("/login?callbackUrl=/".into())
        );
        assert_eq!(
            decide("/restaurantes/meu restaurante", false),
            GuardDecision::Redirect("/login?callbackUrl=/restaurantes/meu%20restaurante".into())
        );
    }

    #[test]
    fn signed_in_user_passes_protected_pages() {
        assert_eq!(decide("/conta", true), GuardDecision::Pass);
        assert_eq!(decide("/restaurantes/1/arquivos", true), GuardDecision::Pass);
    }

    #[test]
    fn excluded_paths_are_never_intercepted() {
        for path in [
            "/api/anything",
            "/api/restaurants/1/files",
            "/_next/static/chunks/main.js",
            "/_next/image",
            "/favicon.ico",
            "/public/files/logo.png",
        ] {
            assert!(is_excluded(path), "{path}");
            assert_eq!(decide(path, false), GuardDecision::Pass);
            assert_eq!(decide(path, true), GuardDecision::Pass);
        }
        assert!(!is_excluded("/conta"));
        assert!(!is_excluded("/_next/data"));
    }
}
