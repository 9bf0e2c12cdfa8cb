//! Utilities shared by the database connectors

pub mod retry;

pub use retry::{RetryConfig, retry_if};
