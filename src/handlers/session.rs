// handlers/session.rs - POST /jwt handler

use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /jwt - Issue a session token for the posted claims
///
/// The body is taken verbatim as the token claims. The signed token is
/// returned only as the `token` cookie; the body is `{"success": true}`.
pub async fn issue(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(claims): Json<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!("issuing session token for {} claim(s)", claims.len());

    let token = state.tokens.issue(claims)?;
    let jar = jar.add(state.cookies.session_cookie(token));

    Ok((jar, Json(json!({ "success": true }))))
}
