//! HTTP server module for the ticketing service.
//!
//! This module provides the Axum-based HTTP server with:
//! - Application state management
//! - Health check endpoint
//! - Router configuration

pub mod health;
pub mod routes;
pub mod state;

pub use health::health_check;
pub use routes::{build_metrics_router, build_router};
pub use state::AppState;
