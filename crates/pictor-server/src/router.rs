//! Axum router construction.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::auth::require_admin;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_routes = Router::new()
        .route(
            "/users/{user_id}/avatar",
            post(routes::avatars::upload_avatar).delete(routes::avatars::delete_avatar),
        )
        .route_layer(middleware::from_fn_with_state(ctx.clone(), require_admin));

    let api_v1 = Router::new()
        .route("/avatars/{*file_path}", get(routes::avatars::get_avatar))
        .merge(admin_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", api_v1)
        .route(
            "/public/api/v1/avatars/{*file_path}",
            get(routes::avatars::get_avatar),
        )
        .layer(DefaultBodyLimit::max(ctx.config.server.max_upload_bytes))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
