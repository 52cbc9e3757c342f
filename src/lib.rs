pub mod auth;
pub mod chirps;
pub mod configuration;
pub mod domain;
pub mod error;
pub mod extractors;
pub mod metrics;
pub mod routes;
pub mod session;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod validators;
