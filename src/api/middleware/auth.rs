//! Session authentication and role gating middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, SESSION_COOKIE_NAME};
use crate::domain::{SessionIdentity, UserRole};
use crate::errors::AppError;
use crate::services::authorize;

/// Session token from the session cookie, falling back to a bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = CookieJar::from_headers(headers).get(SESSION_COOKIE_NAME) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::to_string)
}

/// Resolve the caller's session, if any, into request extensions.
///
/// Never rejects on its own: a missing or stale token just leaves the
/// request anonymous for `require_roles` to judge. A session store outage
/// is reported as such instead of masquerading as a logged-out caller.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(request.headers()) {
        match state.auth_service.resolve_session(&token).await {
            Ok(session) => {
                request.extensions_mut().insert(session);
            }
            Err(e) if e.is_transient() => return e.into_response(),
            Err(e) => tracing::debug!("Ignoring unusable session token: {}", e),
        }
    }

    next.run(request).await
}

/// Gate a route group on the session's role. An empty list only requires
/// a session.
pub async fn require_roles(
    allowed: &'static [UserRole],
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(request.extensions().get::<SessionIdentity>(), allowed)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    #[test]
    fn test_cookie_preferred_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("casetrack_session=from-cookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(session_token(&headers).is_none());
    }
}
