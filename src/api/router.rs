//! API router configuration.

use super::{
    gate::{Gate, require_access},
    handlers::{auth, leaders, tasks},
    state::AppState,
};
use crate::identity::domain::AccessPolicy;
use axum::{
    Router,
    http::{
        Method,
        header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, ORIGIN},
    },
    middleware,
    routing::{get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the application router.
///
/// Route groups are gated by role; `/auth/login` is public.
pub fn create_router(state: AppState) -> Router {
    let gated = |routes: Router<AppState>, policy: AccessPolicy| {
        routes.route_layer(middleware::from_fn_with_state(
            Gate::new(state.auth.clone(), policy),
            require_access,
        ))
    };

    let worker_routes = gated(
        Router::new()
            .route("/leader", get(leaders::list_leaders))
            .route("/leader/", get(leaders::list_leaders))
            .route("/tasks", post(tasks::create).get(tasks::list_own))
            .route("/tasks/", post(tasks::create).get(tasks::list_own))
            .route("/tasks/:id", put(tasks::update).delete(tasks::delete))
            .route("/tasks/:id/progress", put(tasks::update_progress)),
        AccessPolicy::PelaksanaOnly,
    );

    let leader_routes = gated(
        Router::new()
            .route("/tasks/pending", get(tasks::pending))
            .route("/tasks/:id/revise", put(tasks::revise))
            .route("/tasks/:id/approve", put(tasks::approve))
            .route(
                "/tasks/:id/progress/override",
                put(tasks::override_progress),
            ),
        AccessPolicy::LeaderOnly,
    );

    let manager_routes = gated(
        Router::new().route("/tasks/approved", get(tasks::approved)),
        AccessPolicy::ManagerOnly,
    );

    let detail_routes = gated(
        Router::new().route("/tasks/:id", get(tasks::show)),
        AccessPolicy::PelaksanaOrLeader,
    );

    Router::new()
        .route("/auth/login", post(auth::login))
        .merge(worker_routes)
        .merge(leader_routes)
        .merge(manager_routes)
        .merge(detail_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, ACCEPT, AUTHORIZATION])
        .expose_headers([CONTENT_LENGTH])
}
