// Metric catalog, series and statistics
pub mod analytics;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
