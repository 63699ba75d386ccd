pub mod auth;
pub mod cors;

pub use auth::{session_gate, GuardedRouteError, GuardedRoutes, SessionUser};
pub use cors::cors_layer;
