use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "token";

/// Caller-supplied claims. Opaque to the codec apart from `iat`/`exp`.
pub type Claims = Map<String, Value>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("reserved claim \"{0}\" cannot be signed as given")]
    ReservedClaim(&'static str),

    #[error("token expiry is out of range")]
    ExpiryOutOfRange,

    #[error("JWT generation error: {0}")]
    Generation(#[source] jsonwebtoken::errors::Error),

    /// Absent, malformed, forged or expired. Callers only ever learn "unauthorized".
    #[error("invalid session token")]
    Invalid,
}

/// Wire form of the token payload: the claims plus the expiry.
///
/// `iat` travels inside `claims` and only when the caller supplied it, so
/// verified claims come back exactly as they were issued.
#[derive(Debug, Serialize, Deserialize)]
struct SessionPayload {
    #[serde(flatten)]
    claims: Claims,
    exp: i64,
}

/// Issues and verifies HS256 session tokens with a fixed lifetime.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }

        // Signature and expiry only; registered claims like aud/iss/sub are plain data
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn issue(&self, claims: Claims) -> Result<String, TokenError> {
        self.issue_at(claims, Utc::now())
    }

    /// Sign `claims` as if issued at `now`.
    ///
    /// A caller `iat` (integer seconds) is kept and takes the place of `now`
    /// as the issue time. A caller `exp` is refused.
    pub fn issue_at(&self, claims: Claims, now: DateTime<Utc>) -> Result<String, TokenError> {
        if claims.contains_key("exp") {
            return Err(TokenError::ReservedClaim("exp"));
        }
        let issued_at = match claims.get("iat") {
            None => now.timestamp(),
            Some(iat) => iat.as_i64().ok_or(TokenError::ReservedClaim("iat"))?,
        };
        let exp = issued_at
            .checked_add(self.ttl.num_seconds())
            .ok_or(TokenError::ExpiryOutOfRange)?;

        let payload = SessionPayload { claims, exp };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(TokenError::Generation)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<SessionPayload>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.claims)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("session token expired"),
                    ErrorKind::InvalidSignature => tracing::debug!("session token signature mismatch"),
                    other => tracing::debug!("session token rejected: {:?}", other),
                }
                TokenError::Invalid
            })
    }
}

/// Cookie attributes for the session cookie.
///
/// Production deployments are served cross-origin, so the cookie must be
/// `Secure; SameSite=None`; everywhere else it stays same-site strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    pub fn for_production(production: bool) -> Self {
        if production {
            Self {
                secure: true,
                same_site: SameSite::None,
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Strict,
            }
        }
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .build()
    }
}
