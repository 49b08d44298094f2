use axum::{Router, routing::get};

pub mod configurator;
pub mod navigation;
pub mod permissions;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/permissions", permissions::router())
        .nest("/navigation", navigation::router())
        .nest("/configurator", configurator::router())
}
