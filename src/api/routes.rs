//! HTTP API route definitions.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};

/// Create the API router with CORS and request tracing.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route(
            "/api/productos",
            get(handlers::find_all)
                .post(handlers::create_producto)
                .delete(handlers::delete_all),
        )
        .route(
            "/api/productos/:id",
            get(handlers::find_one)
                .put(handlers::update_producto)
                .delete(handlers::delete_producto),
        )
        .route("/api/keep-alive/stats", get(handlers::keep_alive_stats))
        .route("/api/wake-up", post(handlers::wake_up))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// CORS layer from the configured allow-list; permissive when the list is
/// empty. Origins that fail to parse as header values are skipped.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use sqlx::mysql::MySqlPoolOptions;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::db::ProductoRepository;
    use crate::keepalive::{KeepAlive, KEEP_ALIVE_HEADER};

    fn test_config() -> Config {
        Config {
            db_host: "127.0.0.1".to_string(),
            db_user: "root".to_string(),
            db_password: String::new(),
            db_name: "productos_test".to_string(),
            // Nothing listens on the reserved port, so any query fails fast
            // with a storage error rather than touching a real database.
            db_port: 1,
            db_max_connections: 2,
            port: 3000,
            app_env: "development".to_string(),
            cors_origins: None,
            base_url: None,
            keep_alive_interval_secs: 840,
            keep_alive_timeout_secs: 1,
            keep_alive_max_failures: 3,
            rust_log: "info".to_string(),
        }
    }

    fn test_app() -> Router {
        let config = test_config();
        let pool = MySqlPoolOptions::new()
            .connect_lazy(&config.database_url())
            .expect("lazy pool");
        let state = AppState::new(
            ProductoRepository::new(pool),
            KeepAlive::new(&config),
            config.app_env.clone(),
        );
        create_router(state, &config.allowed_origins())
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn index_lists_endpoints() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("/api/productos"));
        assert!(body.contains("/api/keep-alive/stats"));
    }

    #[tokio::test]
    async fn health_returns_full_payload_without_marker_header() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("online"));
        assert!(body.contains("keepAliveStats"));
        assert!(body.contains("environment"));
    }

    #[tokio::test]
    async fn health_returns_minimal_payload_for_keep_alive_pings() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(KEEP_ALIVE_HEADER, "true")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("keepAlive"));
        assert!(!body.contains("keepAliveStats"));
    }

    #[tokio::test]
    async fn keep_alive_stats_endpoint_returns_snapshot() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/keep-alive/stats")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"success\":true"));
        assert!(body.contains("totalPings"));
    }

    #[tokio::test]
    async fn wake_up_acknowledges() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/wake-up")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Servidor despierto"));
    }

    #[tokio::test]
    async fn create_without_body_is_rejected_with_400() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/productos")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response).await;
        assert!(body.contains("El contenido no puede estar vacío"));
    }

    #[tokio::test]
    async fn update_without_body_is_rejected_with_400() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/api/productos/1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn storage_failure_maps_to_500() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/productos")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(body.contains("Ocurrió un error al obtener los productos."));
    }
}
