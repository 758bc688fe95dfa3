// Metric query engine and correlation orchestrator
pub mod analytics;

// Startup wiring
pub mod bootstrap;
