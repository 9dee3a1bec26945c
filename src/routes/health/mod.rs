mod handlers;
mod types;

pub use handlers::{ingest_health, latest_health};
pub use types::LatestHealthResponse;

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_ingest_health, __path_latest_health};
