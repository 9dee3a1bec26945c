mod handlers;
mod types;

pub use handlers::{OFFLINE, effective_status, overview};
pub use types::NodeOverview;

// Re-export utoipa path struct for OpenAPI documentation
pub use handlers::__path_overview;
