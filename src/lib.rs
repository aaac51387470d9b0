//! Vehicle telemetry risk scoring service.
//!
//! `POST /predict` scores one reading with a pretrained classifier and runs the
//! result through the rule-based agents in [`agents`]; `GET /dashboard` reports
//! counters over the in-memory logs kept in [`store`].

pub mod agents;
pub mod config;
pub mod error;
pub mod model;
pub mod routes;
pub mod scorer;
pub mod store;
pub mod synthetic;
pub mod types;

pub use routes::{router, AppState};
pub use scorer::Scorer;
