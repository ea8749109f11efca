//! # API REST
//!
//! REST API implementation for Slotkeeper.
//!
//! Handles:
//! - HTTP endpoints with axum, each accepting `GET` query strings and `POST` JSON bodies
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (parameter decoding, status codes, CORS, request tracing)
//!
//! Uses `api-shared` for request/response types and `slotkeeper-core` for the file operations.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;
pub mod params;

pub use error::ApiError;
pub use params::{ApiRequest, Params};

use api_shared::{
    CheckRes, ContentRes, DeleteFileReq, DeletePlayerReq, DeleteRes, DeleteSlotReq, EmptySlotRes,
    ErrorRes, FileContentRes, FileInfoRes, FilePathReq, HealthRes, OldSlotReq, PlayerReq,
    SlotReq, TransferRes, WriteFileReq, WriteFileRes, WriteSlotReq, WriteSlotRes,
};
use axum::handler::Handler;
use axum::routing::{get, MethodRouter};
use axum::Router;
use slotkeeper_core::{CoreConfig, FileService, SlotService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Holds the resolved configuration and the services built from it. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub slots: SlotService,
    pub files: FileService,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            slots: SlotService::new(cfg.clone()),
            files: FileService::new(cfg.clone()),
            cfg,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::check,
        handlers::player_file,
        handlers::slot_file,
        handlers::transfer,
        handlers::empty_slot,
        handlers::restore_slot,
        handlers::write_slot,
        handlers::file_content,
        handlers::write_file,
        handlers::file_info,
        handlers::delete_file,
        handlers::delete_player_file,
        handlers::delete_slot_file,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        PlayerReq,
        SlotReq,
        OldSlotReq,
        WriteSlotReq,
        FilePathReq,
        WriteFileReq,
        DeleteFileReq,
        DeletePlayerReq,
        DeleteSlotReq,
        CheckRes,
        ContentRes,
        TransferRes,
        EmptySlotRes,
        WriteSlotRes,
        FileContentRes,
        WriteFileRes,
        FileInfoRes,
        DeleteRes,
    ))
)]
pub struct ApiDoc;

/// `GET` and `POST` go to `handler`, a bare `OPTIONS` gets an empty 200 and every other method
/// a JSON 405.
fn endpoint<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler.clone())
        .post(handler)
        .options(handlers::preflight)
        .fallback(handlers::method_not_allowed)
}

/// Build the HTTP application.
///
/// # Arguments
/// * `state` - Shared services, see [`AppState::new`]
///
/// # Returns
/// A `Router` serving every endpoint plus `/swagger-ui` and `/api-docs/openapi.json`, with
/// permissive CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        .route("/check", endpoint(handlers::check))
        .route("/player-file", endpoint(handlers::player_file))
        .route("/slot-file", endpoint(handlers::slot_file))
        .route("/transfer", endpoint(handlers::transfer))
        .route("/empty-slot", endpoint(handlers::empty_slot))
        .route("/restore-slot", endpoint(handlers::restore_slot))
        .route("/write-slot", endpoint(handlers::write_slot))
        .route("/file-content", endpoint(handlers::file_content))
        .route("/write-file", endpoint(handlers::write_file))
        .route("/file-info", endpoint(handlers::file_info))
        .route("/delete-file", endpoint(handlers::delete_file))
        .route("/delete-player-file", endpoint(handlers::delete_player_file))
        .route("/delete-slot-file", endpoint(handlers::delete_slot_file))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use slotkeeper_core::SlotIdPolicy;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(temp: &TempDir) -> Router {
        let cfg = CoreConfig::new(
            temp.path().join("Players"),
            temp.path().join("Slots"),
            temp.path().join("Backups"),
            1024 * 1024,
            SlotIdPolicy::Overwrite,
        )
        .unwrap();
        router(AppState::new(Arc::new(cfg)))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let temp = TempDir::new().unwrap();
        let (status, body) = send(app(&temp), get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn write_slot_without_data_writes_default() {
        let temp = TempDir::new().unwrap();
        let (status, body) = send(
            app(&temp),
            post("/write-slot", json!({"steamid": "123", "file_name": "slot1"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        let file_path = body["file_path"].as_str().unwrap();
        assert!(Path::new(file_path).ends_with("123/slot1.json"));

        let doc: Value = serde_json::from_slice(&fs::read(file_path).unwrap()).unwrap();
        assert_eq!(doc["slot_id"], json!("slot1"));
        assert_eq!(doc["datafile"], Value::Null);
        assert!(doc["created"].is_string());
    }

    #[tokio::test]
    async fn check_accepts_get_query() {
        let temp = TempDir::new().unwrap();
        let (status, body) = send(app(&temp), get("/check?steamid=42")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], json!(false));
        assert!(body["file_path"].as_str().unwrap().ends_with("42.json"));
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn missing_parameters_are_rejected() {
        let temp = TempDir::new().unwrap();
        let (status, body) = send(app(&temp), post("/slot-file", json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "steamid and slot_id are required"}));
    }

    #[tokio::test]
    async fn undecodable_body_is_invalid_json() {
        let temp = TempDir::new().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/check")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(app(&temp), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid JSON"}));
    }

    #[tokio::test]
    async fn unsupported_method_is_405() {
        let temp = TempDir::new().unwrap();
        let request = Request::builder()
            .method("DELETE")
            .uri("/transfer")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app(&temp), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"error": "Method not allowed"}));
    }

    #[tokio::test]
    async fn options_is_empty_ok() {
        let temp = TempDir::new().unwrap();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/transfer")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app(&temp), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    /// Sends `request` with an `Origin` header and returns the status and response headers.
    async fn send_cross_origin(
        app: Router,
        mut request: Request<Body>,
    ) -> (StatusCode, axum::http::HeaderMap) {
        request
            .headers_mut()
            .insert("origin", "http://game-panel.example".parse().unwrap());
        let response = app.oneshot(request).await.unwrap();
        (response.status(), response.headers().clone())
    }

    fn allow_origin(headers: &axum::http::HeaderMap) -> Option<&str> {
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn cors_header_on_successful_get() {
        let temp = TempDir::new().unwrap();
        let (status, headers) = send_cross_origin(app(&temp), get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(allow_origin(&headers), Some("*"));
    }

    #[tokio::test]
    async fn cors_header_on_error_responses() {
        let temp = TempDir::new().unwrap();
        let request = Request::builder()
            .method("DELETE")
            .uri("/transfer")
            .body(Body::empty())
            .unwrap();
        let (status, headers) = send_cross_origin(app(&temp), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(allow_origin(&headers), Some("*"));

        let (status, headers) = send_cross_origin(app(&temp), post("/slot-file", json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(allow_origin(&headers), Some("*"));
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        let temp = TempDir::new().unwrap();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/transfer")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();

        let (status, headers) = send_cross_origin(app(&temp), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(allow_origin(&headers), Some("*"));
        let methods = headers
            .get("access-control-allow-methods")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(methods.contains("POST"), "{methods}");
    }

    #[tokio::test]
    async fn traversal_in_identifier_is_rejected() {
        let temp = TempDir::new().unwrap();
        let (status, body) = send(
            app(&temp),
            post("/transfer", json!({"steamid": "../x", "old_slot_id": "s1"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("steamid"));
    }

    #[tokio::test]
    async fn transfer_failure_is_reported_in_body() {
        let temp = TempDir::new().unwrap();
        let (status, body) = send(
            app(&temp),
            post("/transfer", json!({"steamid": "7", "old_slot_id": "s1"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Player file not found"));
    }

    #[tokio::test]
    async fn transfer_then_restore_over_http() {
        let temp = TempDir::new().unwrap();
        let players = temp.path().join("Players");
        fs::create_dir_all(&players).unwrap();
        fs::write(players.join("7.json"), r#"{"datafile": {"hp": 5}}"#).unwrap();

        let (_, body) = send(
            app(&temp),
            get("/transfer?steamid=7&old_slot_id=s1"),
        )
        .await;
        assert_eq!(body["success"], json!(true));
        assert!(!players.join("7.json").exists());

        let (_, body) = send(
            app(&temp),
            post("/restore-slot", json!({"steamid": "7", "slot_id": "s1"})),
        )
        .await;
        assert_eq!(body["success"], json!(true));

        let restored: Value =
            serde_json::from_slice(&fs::read(players.join("7.json")).unwrap()).unwrap();
        assert_eq!(restored, json!({"datafile": {"hp": 5}, "slot_id": "s1"}));
    }

    #[tokio::test]
    async fn write_file_get_with_invalid_json_data() {
        let temp = TempDir::new().unwrap();
        let uri = format!(
            "/write-file?file_path={}&data=%7Bbroken",
            temp.path().join("x.json").display()
        );

        let (status, body) = send(app(&temp), get(&uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid JSON"}));
    }

    #[tokio::test]
    async fn delete_file_missing_path_succeeds() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gone.json");

        let (status, body) = send(
            app(&temp),
            post(
                "/delete-file",
                json!({"file_path": path.display().to_string(), "backup": true}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["deleted"], json!(false));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let temp = TempDir::new().unwrap();
        let (status, body) = send(app(&temp), get("/api-docs/openapi.json")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/transfer").is_some());
    }
}
