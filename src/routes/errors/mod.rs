mod handlers;
mod types;

pub use handlers::{ingest_error, recent_errors};
pub use types::ErrorLogResponse;

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_ingest_error, __path_recent_errors};
