// Shared components
pub mod config;
pub mod error;
pub mod metrics;

// Domain layer
pub mod prompt;

// Application layer
pub mod api;
pub mod server;
