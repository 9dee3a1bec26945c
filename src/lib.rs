//! Aeris - indoor climate monitoring backend
//!
//! Ingests readings, alerts, errors and health reports from sensor nodes and
//! serves them back for the dashboard. The library exposes the core modules for
//! testing and for the `sample-feeder` binary.

pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod feeder;
pub mod mold;
pub mod payload;
pub mod routes;
pub mod services;
