mod handlers;
mod types;

pub use handlers::{ingest_alert, recent_alerts};
pub use types::AlertResponse;

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_ingest_alert, __path_recent_alerts};
