//! Custom extractors for Axum handlers.

pub mod json_document;
pub mod object_id_path;

pub use json_document::JsonDocument;
pub use object_id_path::ObjectIdPath;
