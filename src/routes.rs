use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::handlers::{blogs, comments, root, session, users, wishlist};
use crate::middleware::session_gate;
use crate::state::AppState;

/// The full HTTP surface with the session gate applied.
///
/// CORS and request tracing are added by the binary so tests can drive the
/// bare router.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root::root))
        .route("/health", get(root::health))
        .merge(session_routes())
        .merge(blog_routes())
        .merge(user_routes())
        .merge(wishlist_routes())
        .merge(comment_routes())
        // Matched routes only, so the gate sees the route pattern
        .route_layer(from_fn_with_state(state.clone(), session_gate))
        .with_state(state)
}

fn session_routes() -> Router<AppState> {
    Router::new().route("/jwt", post(session::issue))
}

fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(blogs::list).post(blogs::create))
        .route("/blogs/:id", get(blogs::get).put(blogs::update))
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(users::list).post(users::create))
}

fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(wishlist::list).post(wishlist::create))
        .route("/myWishlist", get(wishlist::list_mine))
        .route("/myWishlist/:id", get(wishlist::get).delete(wishlist::delete))
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments", get(comments::list).post(comments::create))
        .route("/comment", get(comments::list_for))
}
