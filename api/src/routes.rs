use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the main application router with all routes and middleware
#[tracing::instrument(skip(state))]
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Schedule endpoints
        .route(
            "/api/maintenance/schedules",
            post(handlers::schedules::create_schedule),
        )
        .route(
            "/api/maintenance/schedules",
            get(handlers::schedules::list_schedules),
        )
        .route(
            "/api/maintenance/schedules/:id",
            get(handlers::schedules::get_schedule),
        )
        .route(
            "/api/maintenance/schedules/:id",
            put(handlers::schedules::update_schedule),
        )
        .route(
            "/api/maintenance/schedules/:id",
            delete(handlers::schedules::deactivate_schedule),
        )
        // Execution endpoints
        .route(
            "/api/maintenance/schedules/:id/executions",
            post(handlers::schedules::create_execution),
        )
        .route(
            "/api/maintenance/schedules/:id/executions",
            get(handlers::schedules::list_schedule_executions),
        )
        .route(
            "/api/maintenance/executions/:id",
            get(handlers::executions::get_execution),
        )
        .route(
            "/api/maintenance/executions/:id",
            put(handlers::executions::update_execution),
        )
        // Dashboard endpoints
        .route(
            "/api/maintenance/dashboard/overdue",
            get(handlers::dashboard::overdue_schedules),
        )
        .route(
            "/api/maintenance/dashboard/upcoming",
            get(handlers::dashboard::upcoming_schedules),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
