//! Synthetic load generator for demos.
//!
//! Posts fabricated readings, health reports, and occasional alerts and errors
//! to a running backend on a fixed interval. Send failures are logged and
//! dropped; nothing is retried.

pub mod client;
mod error;
pub mod scheduler;
pub mod synth;

pub use client::BackendClient;
pub use error::FeederError;
