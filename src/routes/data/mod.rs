mod handlers;
mod types;

pub use handlers::{get_history, ingest_data};
pub use types::{HistoryQuery, HistoryRow};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_get_history, __path_ingest_data};
