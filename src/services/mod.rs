pub mod nodes;
pub mod rate_limit;
