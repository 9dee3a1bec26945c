pub mod logging;
mod state;
pub mod timestamp;

pub use state::AppState;
