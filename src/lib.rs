pub mod analytics;
pub mod config;
pub mod enrich;
pub mod ingest;
pub mod model;
pub mod output;

/// Application name for XDG paths
pub const APP_NAME: &str = "spinlog";
