//! Presentation layer
//!
//! HTML pages and the HTTP server that serves them.

pub mod pages;
pub mod server;

pub use server::{router, DashboardServer, DashboardServerConfig};
