//! HTTP middleware: CORS and security headers.
//!
//! ```ignore
//! use axum_helpers::http::{allowed_origins_from_env, create_cors_layer, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(security_headers))
//!     .layer(create_cors_layer(allowed_origins_from_env()?));
//! ```

pub mod cors;
pub mod security;

pub use cors::{
    DEFAULT_ALLOWED_ORIGIN, allowed_origins_from_env, create_cors_layer, parse_allowed_origins,
};
pub use security::security_headers;
