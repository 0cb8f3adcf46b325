//! Product repository: all SQL against the `productos` table lives here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;
use tracing::error;

use crate::error::StorageError;

/// A persisted product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Producto {
    /// Storage-assigned identifier, immutable once created.
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
    pub precio: Decimal,
    pub stock: i32,
}

/// Client-supplied product fields, without an identifier.
///
/// Used both for creation and for wholesale updates (all four fields are
/// overwritten together; there is no partial patch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevoProducto {
    pub nombre: String,
    pub descripcion: String,
    pub precio: Decimal,
    pub stock: i32,
}

impl NuevoProducto {
    fn into_producto(self, id: i64) -> Producto {
        Producto {
            id,
            nombre: self.nombre,
            descripcion: self.descripcion,
            precio: self.precio,
            stock: self.stock,
        }
    }
}

/// High-level, application-specific interface to the `productos` table.
/// Encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct ProductoRepository {
    pool: MySqlPool,
}

impl ProductoRepository {
    /// Creates a new repository over a shared connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a new row and return it together with the generated id.
    pub async fn create(&self, nuevo: NuevoProducto) -> Result<Producto, StorageError> {
        let result = sqlx::query(
            "INSERT INTO productos (nombre, descripcion, precio, stock) VALUES (?, ?, ?, ?)",
        )
        .bind(&nuevo.nombre)
        .bind(&nuevo.descripcion)
        .bind(nuevo.precio)
        .bind(nuevo.stock)
        .execute(&self.pool)
        .await
        .map_err(log_db_error)?;

        Ok(nuevo.into_producto(result.last_insert_id() as i64))
    }

    /// All rows, optionally restricted to names containing `nombre` as a
    /// substring (`LIKE '%nombre%'`). An empty result is not an error.
    pub async fn find_all(&self, nombre: Option<&str>) -> Result<Vec<Producto>, StorageError> {
        let productos = match nombre {
            Some(filtro) => {
                sqlx::query_as::<_, Producto>(
                    "SELECT id, nombre, descripcion, precio, stock FROM productos \
                     WHERE nombre LIKE ?",
                )
                .bind(format!("%{filtro}%"))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Producto>(
                    "SELECT id, nombre, descripcion, precio, stock FROM productos",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(log_db_error)?;

        Ok(productos)
    }

    /// The single row matching `id`, or [`StorageError::NotFound`].
    pub async fn find_by_id(&self, id: i64) -> Result<Producto, StorageError> {
        sqlx::query_as::<_, Producto>(
            "SELECT id, nombre, descripcion, precio, stock FROM productos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_db_error)?
        .ok_or(StorageError::NotFound)
    }

    /// Overwrite all four fields of the row matching `id`.
    ///
    /// Returns the identifier plus the new fields without re-reading from
    /// storage. Zero affected rows means the id did not match.
    pub async fn update_by_id(
        &self,
        id: i64,
        campos: NuevoProducto,
    ) -> Result<Producto, StorageError> {
        let result = sqlx::query(
            "UPDATE productos SET nombre = ?, descripcion = ?, precio = ?, stock = ? \
             WHERE id = ?",
        )
        .bind(&campos.nombre)
        .bind(&campos.descripcion)
        .bind(campos.precio)
        .bind(campos.stock)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(log_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(campos.into_producto(id))
    }

    /// Delete the row matching `id`; [`StorageError::NotFound`] when absent.
    pub async fn remove_by_id(&self, id: i64) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM productos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(log_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Delete every row. Unlike [`remove_by_id`](Self::remove_by_id), an
    /// already-empty table is a success; the affected count is returned but
    /// never interpreted as not-found.
    pub async fn remove_all(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM productos")
            .execute(&self.pool)
            .await
            .map_err(log_db_error)?;

        Ok(result.rows_affected())
    }
}

/// Log the native database error before handing it to the caller.
fn log_db_error(err: sqlx::Error) -> StorageError {
    error!("database error: {err}");
    StorageError::Database(err)
}
