pub mod auth;
pub mod middleware;
pub mod videos;

pub use middleware::*;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: AppState) -> Router {
    // Sign-in entry point; signed-in users are bounced back home
    let auth_public = Router::new()
        .route("/auth/login", get(auth::login))
        .layer(from_fn(redirect_authenticated));

    // Profile refresh requires a live session
    let auth_private = Router::new()
        .route("/auth/profile", get(auth::refresh_profile))
        .layer(from_fn(require_session));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/auth/callback", post(auth::callback))
        .route("/auth/session", get(auth::get_session))
        .route("/auth/logout", post(auth::logout))
        .route("/api/videos/popular", get(videos::most_popular))
        .route("/api/videos/category/:id", get(videos::by_category))
        .route("/api/search", get(videos::search))
        .merge(auth_public)
        .merge(auth_private)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
