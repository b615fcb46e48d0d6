//! Route-Definitionen fuer die REST-API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use wordcraft_observability::{health_router, timing_middleware};

use crate::rest::{handlers, ApiState};

/// Routen unter /users
pub fn users_router() -> Router<ApiState> {
    Router::new()
        .route("/users/authenticate", post(handlers::users::authenticate))
        .route("/users/register", post(handlers::users::register))
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/:id",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
}

/// Vollstaendiger Router inkl. `/health`, Timing und Tracing (ohne CORS)
pub fn api_router(state: ApiState) -> Router {
    let metriken = state.metriken.clone();
    let health = state.health.clone();

    users_router()
        .with_state(state)
        .merge(health_router(health))
        .layer(middleware::from_fn_with_state(metriken, timing_middleware))
        .layer(TraceLayer::new_for_http())
}
