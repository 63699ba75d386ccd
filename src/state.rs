use std::sync::Arc;

use crate::auth::{CookiePolicy, TokenCodec, TokenError};
use crate::config::AppConfig;
use crate::database::RecordStore;
use crate::middleware::{GuardedRouteError, GuardedRoutes};

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    GuardedRoute(#[from] GuardedRouteError),
}

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub tokens: Arc<TokenCodec>,
    pub cookies: CookiePolicy,
    pub guarded: Arc<GuardedRoutes>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: &AppConfig) -> Result<Self, StateError> {
        let tokens = TokenCodec::new(&config.security.jwt_secret, config.security.jwt_expiry())?;
        let guarded = GuardedRoutes::parse(&config.security.guarded_routes)?;

        Ok(Self {
            store,
            tokens: Arc::new(tokens),
            cookies: CookiePolicy::for_production(config.is_production()),
            guarded: Arc::new(guarded),
        })
    }
}
