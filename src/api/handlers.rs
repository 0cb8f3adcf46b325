//! HTTP API handlers.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::db::{NuevoProducto, ProductoRepository};
use crate::keepalive::{KeepAlive, KEEP_ALIVE_HEADER};
use crate::metrics;
use crate::utils;

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Product repository over the shared pool.
    pub repo: ProductoRepository,
    /// Keep-alive task, for stats and the health payload.
    pub keep_alive: KeepAlive,
    /// Runtime environment name.
    pub environment: String,
    /// Process start instant, for uptime reporting.
    started_at: Instant,
}

impl AppState {
    /// Create new app state.
    pub fn new(repo: ProductoRepository, keep_alive: KeepAlive, environment: String) -> Self {
        Self {
            repo,
            keep_alive,
            environment,
            started_at: Instant::now(),
        }
    }

    fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Generic message payload for confirmations and errors.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn message(status: StatusCode, text: impl Into<String>) -> Response {
    (
        status,
        Json(MessageResponse {
            message: text.into(),
        }),
    )
        .into_response()
}

fn empty_body_response() -> Response {
    message(StatusCode::BAD_REQUEST, "El contenido no puede estar vacío!")
}

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct FindAllParams {
    pub nombre: Option<String>,
}

/// `POST /api/productos` — create a product from the request body.
pub async fn create_producto(
    State(state): State<AppState>,
    body: Result<Json<NuevoProducto>, JsonRejection>,
) -> Response {
    let Ok(Json(nuevo)) = body else {
        return empty_body_response();
    };

    match state.repo.create(nuevo).await {
        Ok(producto) => {
            metrics::inc_productos_created();
            Json(producto).into_response()
        }
        Err(_) => message(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Ocurrió un error al crear el producto.",
        ),
    }
}

/// `GET /api/productos` — list products, optionally filtered by name.
pub async fn find_all(
    State(state): State<AppState>,
    Query(params): Query<FindAllParams>,
) -> Response {
    match state.repo.find_all(params.nombre.as_deref()).await {
        Ok(productos) => Json(productos).into_response(),
        Err(_) => message(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Ocurrió un error al obtener los productos.",
        ),
    }
}

/// `GET /api/productos/:id` — fetch a single product.
pub async fn find_one(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.repo.find_by_id(id).await {
        Ok(producto) => Json(producto).into_response(),
        Err(err) if err.is_not_found() => message(
            StatusCode::NOT_FOUND,
            format!("No se encontró producto con id {id}."),
        ),
        Err(_) => message(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error al recuperar producto con id {id}"),
        ),
    }
}

/// `PUT /api/productos/:id` — overwrite all fields of a product.
pub async fn update_producto(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<NuevoProducto>, JsonRejection>,
) -> Response {
    let Ok(Json(campos)) = body else {
        return empty_body_response();
    };

    match state.repo.update_by_id(id, campos).await {
        Ok(producto) => {
            metrics::inc_productos_updated();
            Json(producto).into_response()
        }
        Err(err) if err.is_not_found() => message(
            StatusCode::NOT_FOUND,
            format!("No se encontró producto con id {id}."),
        ),
        Err(_) => message(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error al actualizar producto con id {id}"),
        ),
    }
}

/// `DELETE /api/productos/:id` — delete a single product.
pub async fn delete_producto(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.repo.remove_by_id(id).await {
        Ok(()) => {
            metrics::inc_productos_deleted(1);
            message(StatusCode::OK, "Producto eliminado correctamente!")
        }
        Err(err) if err.is_not_found() => message(
            StatusCode::NOT_FOUND,
            format!("No se encontró producto con id {id}."),
        ),
        Err(_) => message(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("No se pudo eliminar producto con id {id}"),
        ),
    }
}

/// `DELETE /api/productos` — delete every product.
pub async fn delete_all(State(state): State<AppState>) -> Response {
    match state.repo.remove_all().await {
        Ok(count) => {
            metrics::inc_productos_deleted(count);
            message(
                StatusCode::OK,
                "Todos los productos fueron eliminados correctamente!",
            )
        }
        Err(_) => message(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error eliminando todos los productos.",
        ),
    }
}

/// `GET /health` — health check.
///
/// Keep-alive pings carry the marker header and get a minimal payload; real
/// checks get the full status including memory and keep-alive stats.
pub async fn health(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let is_keep_alive = headers
        .get(KEEP_ALIVE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value == "true")
        .unwrap_or(false);

    if is_keep_alive {
        return Json(json!({
            "status": "OK",
            "timestamp": Utc::now().to_rfc3339(),
            "uptime": state.uptime_secs(),
            "keepAlive": true,
        }))
        .into_response();
    }

    Json(json!({
        "message": "Bienvenido a la API de productos.",
        "status": "online",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.environment,
        "uptime": state.uptime_secs(),
        "memory": utils::memory_usage_mb(),
        "keepAliveStats": state.keep_alive.stats(),
    }))
    .into_response()
}

/// `GET /api/keep-alive/stats` — keep-alive counter snapshot.
pub async fn keep_alive_stats(State(state): State<AppState>) -> Response {
    Json(json!({
        "success": true,
        "data": state.keep_alive.stats(),
    }))
    .into_response()
}

/// `POST /api/wake-up` — manual wake trigger.
///
/// Answers immediately; it does not itself invoke the keep-alive task. The
/// request alone is enough to keep a hosted instance warm.
pub async fn wake_up(State(state): State<AppState>) -> Response {
    info!("wake-up request received");

    Json(json!({
        "success": true,
        "message": "Servidor despierto y listo",
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": state.uptime_secs(),
    }))
    .into_response()
}

/// `GET /` — welcome payload listing the available endpoints.
pub async fn index() -> Response {
    Json(json!({
        "message": "Bienvenido a la API de productos.",
        "status": "online",
        "timestamp": Utc::now().to_rfc3339(),
        "endpoints": {
            "health": "/health",
            "wakeUp": "/api/wake-up",
            "keepAliveStats": "/api/keep-alive/stats",
            "productos": "/api/productos",
        },
    }))
    .into_response()
}
