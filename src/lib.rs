pub mod config;
pub mod constants;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod places;
pub mod tabular;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;
