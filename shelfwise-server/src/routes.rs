//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// CORS policy from a comma-separated origin list, `*` for any
fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let allow_origin = match origins {
        Some("*") => AllowOrigin::any(),
        Some(origins) => AllowOrigin::list(
            origins
                .split(',')
                .filter_map(|s| s.trim().parse::<HeaderValue>().ok()),
        ),
        None => AllowOrigin::list(DEV_ORIGINS.into_iter().map(HeaderValue::from_static)),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router
pub fn create_router(state: AppState, cors_origins: Option<&str>) -> Router {
    let api_routes = Router::new()
        // Reading lists
        .route(
            "/lists/:collection",
            get(handlers::list_collection).post(handlers::add_to_collection),
        )
        .route(
            "/lists/:collection/:key",
            get(handlers::get_record).delete(handlers::remove_record),
        )
        .route("/lists/:collection/:key/start", post(handlers::start_from_queue))
        // Progress and completion
        .route("/progress/:key", put(handlers::update_progress))
        .route("/reading/latest", get(handlers::latest_reading))
        .route("/reading/reconcile", post(handlers::reconcile))
        .route("/stats", get(handlers::reading_stats))
        // Catalog
        .route("/catalog/search", get(handlers::search_catalog))
        .route("/catalog/works/:key", get(handlers::get_work))
        .route("/catalog/subjects/:subject", get(handlers::books_by_subject))
        .route("/catalog/authors/:key", get(handlers::get_author))
        .route("/bestsellers", get(handlers::list_bestsellers))
        // SSE endpoint
        .route("/sync", get(handlers::sync_events));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
        .with_state(state)
}
