pub mod alerts;
pub mod error_logs;
pub mod health_reports;
pub mod nodes;
pub mod sensor_data;
