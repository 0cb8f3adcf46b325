//! CRUD REST API for a product inventory backed by MySQL.
//!
//! The service exposes the classic five operations on the `productos` table
//! plus a keep-alive task that pings the service's own `/health` endpoint on
//! a fixed interval so a hosted instance is not idled down by the platform.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Error types
//! - [`db`]: Connection pool and product repository
//! - [`api`]: HTTP handlers and routes
//! - [`keepalive`]: Self-ping background task
//! - [`metrics`]: Operation counters
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod keepalive;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::StorageError;
