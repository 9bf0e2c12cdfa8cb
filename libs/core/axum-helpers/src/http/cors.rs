use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Origin allowed when `CORS_ALLOWED_ORIGIN` is unset (Vite dev server).
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Parse a comma-separated origin list such as
/// `http://localhost:5173,https://rentease.example`.
pub fn parse_allowed_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    Ok(origins)
}

/// Origins from `CORS_ALLOWED_ORIGIN`, or [`DEFAULT_ALLOWED_ORIGIN`].
pub fn allowed_origins_from_env() -> io::Result<Vec<HeaderValue>> {
    let raw = core_config::env_or_default("CORS_ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN);
    parse_allowed_origins(&raw)
}

/// CORS layer for the browser client:
/// - the given origins, credentials allowed
/// - GET, POST, PUT, DELETE, PATCH, OPTIONS
/// - Content-Type, Authorization and Accept headers
/// - 1 hour preflight cache
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
