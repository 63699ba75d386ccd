use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use std::collections::HashSet;
use thiserror::Error;

use crate::auth::{Claims, SESSION_COOKIE};
use crate::error::ApiError;
use crate::state::AppState;

/// Session context extracted from the `token` cookie.
///
/// Handlers on guarded routes can take `Extension<SessionUser>`.
#[derive(Clone, Debug)]
pub struct SessionUser(pub Claims);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid guarded route {0:?}, expected \"METHOD /path\"")]
pub struct GuardedRouteError(pub String);

/// Routes that require a valid session cookie, keyed by method and route pattern
/// (`/myWishlist/:id`, not the concrete path).
#[derive(Debug, Clone, Default)]
pub struct GuardedRoutes {
    routes: HashSet<(Method, String)>,
}

impl GuardedRoutes {
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self, GuardedRouteError> {
        let mut routes = HashSet::new();
        for entry in entries {
            let entry = entry.as_ref().trim();
            let (method, path) = entry
                .split_once(char::is_whitespace)
                .ok_or_else(|| GuardedRouteError(entry.to_string()))?;
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .map_err(|_| GuardedRouteError(entry.to_string()))?;
            let path = path.trim();
            if !path.starts_with('/') {
                return Err(GuardedRouteError(entry.to_string()));
            }
            routes.insert((method, path.to_string()));
        }
        Ok(Self { routes })
    }

    pub fn contains(&self, method: &Method, pattern: &str) -> bool {
        self.routes.contains(&(method.clone(), pattern.to_string()))
    }
}

/// Session gate: rejects guarded routes that lack a valid `token` cookie
/// and injects `SessionUser` for the ones that have it. Unguarded routes
/// pass straight through.
pub async fn session_gate(
    State(state): State<AppState>,
    matched: Option<MatchedPath>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let guarded = matched
        .as_ref()
        .is_some_and(|path| state.guarded.contains(request.method(), path.as_str()));
    if !guarded {
        return Ok(next.run(request).await);
    }

    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let Some(token) = token else {
        tracing::debug!("rejecting {} {}: no session cookie", request.method(), request.uri().path());
        return Err(ApiError::Unauthorized);
    };

    let claims = state.tokens.verify(&token)?;
    tracing::debug!("session accepted for {} {}", request.method(), request.uri().path());

    request.extensions_mut().insert(SessionUser(claims));
    Ok(next.run(request).await)
}
