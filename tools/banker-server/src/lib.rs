//! Banker's Algorithm HTTP Server
//!
//! Exposes the safety check over JSON and serves the presentation assets
//! that render its result.
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /bankers` | [`routes::check_bankers`] |
//! | `GET /health` | [`routes::health`] |
//! | anything else | static files from [`ServerConfig::web_dir`] |

pub mod config;
pub mod error;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn router(config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/bankers", post(routes::check_bankers))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .fallback_service(ServeDir::new(&config.web_dir))
        .layer(middleware::from_fn(add_headers))
        .layer(TraceLayer::new_for_http());

    if config.cors {
        app = app.layer(CorsLayer::permissive());
    }

    app
}

/// Disable caching of computed results and fix MIME types for assets
async fn add_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    if path == "/bankers" || path == "/health" {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        return response;
    }

    if path.ends_with(".js") || path.ends_with(".mjs") {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/javascript; charset=utf-8"),
        );
    } else if path.ends_with(".css") {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/css; charset=utf-8"),
        );
    } else if path.ends_with(".html") {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
    } else if path.ends_with(".json") {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
    }

    response
}
