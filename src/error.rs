// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::auth::TokenError;
use crate::database::StoreError;

/// Errors a handler or the session gate can surface.
///
/// Only `Unauthorized` carries a structured body. Everything else is a bare
/// 500 with a plain-text body; the cause goes to the log, not the client.
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized,

    // 500 Internal Server Error
    Store(StoreError),
    Token(TokenError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) | ApiError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => ApiError::Unauthorized,
            other => ApiError::Token(other),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Store(e) => write!(f, "store error: {}", e),
            ApiError::Token(e) => write!(f, "token error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        match self {
            ApiError::Unauthorized => (status, Json(json!({ "message": "Unauthorized" }))).into_response(),
            ApiError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (status, "Internal Server Error").into_response()
            }
            ApiError::Token(e) => {
                tracing::error!("Token error: {}", e);
                (status, "Internal Server Error").into_response()
            }
        }
    }
}
