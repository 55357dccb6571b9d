//! Service layer for the prediction board
//!
//! This module contains the shared application state and health checks.

pub mod app;
pub mod health;

pub use app::{AppState, ServiceError};
pub use health::{HealthCheck, HealthStatus};
