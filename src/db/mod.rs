//! Database connection pool and product repository.

mod repository;

pub use repository::{NuevoProducto, Producto, ProductoRepository};

use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::config::Config;
use crate::error::StorageError;

/// Establish a MySQL connection pool from configuration.
///
/// The pool is shared across the whole application; its bounded size and
/// queuing are the only concurrency coordination the service needs.
pub async fn connect(config: &Config) -> Result<MySqlPool, StorageError> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url())
        .await?;

    Ok(pool)
}
