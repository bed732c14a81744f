//! JSON HTTP API over a [`RuleStore`].
//!
//! | Method | Path                             | Purpose                     |
//! |--------|----------------------------------|-----------------------------|
//! | GET    | `/api/rules`                     | list rules (`skip`, `limit`) |
//! | POST   | `/api/rules`                     | create a rule               |
//! | POST   | `/api/rules/combine`             | combine two rules           |
//! | GET    | `/api/rules/{id}`                | fetch one rule              |
//! | DELETE | `/api/rules/{id}`                | delete a rule               |
//! | POST   | `/api/rules/{id}/evaluate`       | evaluate against a record   |
//! | GET    | `/api/rules/{id}/evaluations`    | evaluation history          |
//! | GET    | `/health`                        | liveness                    |

mod error;
mod extract;
mod handlers;
mod types;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::RuleStore;

pub use error::ApiError;
pub use extract::{JsonBody, PathParam, QueryParams};
pub use types::*;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: RuleStore,
}

/// Build the application router with all routes and middleware.
pub fn router(store: RuleStore, config: &ServerConfig) -> Router {
    let state = Arc::new(AppState { store });

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/rules",
            get(handlers::list_rules).post(handlers::create_rule),
        )
        .route("/api/rules/combine", post(handlers::combine_rules))
        .route(
            "/api/rules/{id}",
            get(handlers::get_rule).delete(handlers::delete_rule),
        )
        .route("/api/rules/{id}/evaluate", post(handlers::evaluate_rule))
        .route(
            "/api/rules/{id}/evaluations",
            get(handlers::list_evaluations),
        )
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
