//! HTTP surface
//!
//! - `POST /api/images` stores a rendered snapshot and returns its id.
//! - `GET /api/images/:id` serves the share page for a live snapshot.
//! - `GET /api/weeks` and `GET /api/countries` expose the calculator and
//!   the country table as JSON.
//! - Anything else is served from the static front-end shell.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{AppError, AppResult, ErrorResponse};
pub use state::AppState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::error;

use crate::config::AppConfig;
use handlers::{compute_weeks, healthcheck, list_countries, save_image, show_image};

pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let shell = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    Router::new()
        .route("/health", get(healthcheck))
        .route("/api/images", post(save_image).fallback_service(shell.clone()))
        .route("/api/images/:id", get(show_image))
        .route("/api/weeks", get(compute_weeks))
        .route("/api/countries", get(list_countries))
        .fallback_service(shell)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_headers(cors::Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS]),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "request handler panicked");

    AppError::internal("internal server error").into_response()
}
