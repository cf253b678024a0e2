//! # Student Attendance API
//!
//! REST API over students, classes and attendance records, served from a
//! relational store behind a one-minute read-through cache. Swagger UI
//! documents the surface at `/swagger-ui`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Axum HTTP Server                         │
//! │        (/api/students, /api/classes, /api/Attendances)      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ApiContext                               │
//! │              (Cached Repositories per Entity)               │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │  Redis / In-Memory      │   │           SQLite             │
//! │  (60s read-through)     │   │     (Source of Truth)        │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod openapi;

use axum::{
    Router,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Redirect},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use handlers::{attendances, classes, students};
use openapi::{ApiDoc, DOCS_PATH, SPEC_PATH};

pub use config::{CacheBackend, Config, ConfigError};
pub use context::{ApiContext, ApiContextBuilder};
pub use error::{ApiError, ApiResult};

/// Health check endpoint
pub async fn health_check(State(ctx): State<ApiContext>) -> impl IntoResponse {
    match ctx.store.health_check().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable")
        }
    }
}

/// Build the Axum router
pub fn build_router(ctx: ApiContext) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        // Students
        .route("/api/students", get(students::list).post(students::create))
        .route(
            "/api/students/{id}",
            get(students::get_by_id)
                .put(students::update)
                .patch(students::patch)
                .delete(students::delete),
        )
        // Classes
        .route("/api/classes", get(classes::list).post(classes::create))
        .route(
            "/api/classes/{id}",
            get(classes::get_by_id)
                .put(classes::update)
                .patch(classes::patch)
                .delete(classes::delete),
        )
        // Attendances
        .route(
            "/api/Attendances",
            get(attendances::list).post(attendances::create),
        )
        .route(
            "/api/Attendances/{id}",
            get(attendances::get_by_id)
                .patch(attendances::patch)
                .delete(attendances::delete),
        )
        // Student id first; the segment name must match `{id}` above
        .route(
            "/api/Attendances/{id}/{class_id}",
            get(attendances::get_by_pair).put(attendances::update_by_pair),
        )
        // Health check and API docs
        .route("/health", get(health_check))
        .route("/", get(|| async { Redirect::temporary(DOCS_PATH) }))
        .merge(SwaggerUi::new(DOCS_PATH).url(SPEC_PATH, ApiDoc::openapi()))
        // State and middleware
        .with_state(ctx)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
