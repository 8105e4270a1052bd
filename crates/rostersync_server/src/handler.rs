//! Routes and request handlers.

use crate::error::{ServerError, ServerResult};
use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use rostersync_engine::{
    BasicAuthHeaders, BlockingTransport, HeaderProvider, ReactiveTransport, SyncService,
};
use rostersync_protocol::ResultEnvelope;
use rostersync_store::StudentStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Shared state handed to every handler.
pub struct AppState<S, R, B, H = BasicAuthHeaders> {
    /// The sync service the routes trigger.
    pub service: Arc<SyncService<S, R, B, H>>,
}

impl<S, R, B, H> AppState<S, R, B, H> {
    /// Creates handler state around a shared service.
    pub fn new(service: Arc<SyncService<S, R, B, H>>) -> Self {
        Self { service }
    }
}

impl<S, R, B, H> Clone for AppState<S, R, B, H> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Query string of the post routes.
#[derive(Debug, Default, Deserialize)]
pub struct PostParams {
    /// Destination of the outbound sync.
    #[serde(rename = "postUrl")]
    pub post_url: Option<String>,
}

/// Builds the router exposing the four sync operations and `/health`.
pub fn build_router<S, R, B, H>(state: AppState<S, R, B, H>) -> Router
where
    S: StudentStore + 'static,
    R: ReactiveTransport + 'static,
    B: BlockingTransport + 'static,
    H: HeaderProvider + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/students/fetch/reactive",
            get(fetch_reactive_handler::<S, R, B, H>),
        )
        .route(
            "/api/students/fetch/blocking",
            get(fetch_blocking_handler::<S, R, B, H>),
        )
        .route(
            "/api/students/post/reactive",
            post(post_reactive_handler::<S, R, B, H>),
        )
        .route(
            "/api/students/post/blocking",
            post(post_blocking_handler::<S, R, B, H>),
        )
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn fetch_reactive_handler<S, R, B, H>(
    State(state): State<AppState<S, R, B, H>>,
) -> ServerResult<Json<ResultEnvelope>>
where
    S: StudentStore + 'static,
    R: ReactiveTransport + 'static,
    B: BlockingTransport + 'static,
    H: HeaderProvider + 'static,
{
    info!("Fetch requested (reactive)");
    Ok(Json(state.service.fetch_and_save_reactive().await))
}

async fn fetch_blocking_handler<S, R, B, H>(
    State(state): State<AppState<S, R, B, H>>,
) -> ServerResult<Json<ResultEnvelope>>
where
    S: StudentStore + 'static,
    R: ReactiveTransport + 'static,
    B: BlockingTransport + 'static,
    H: HeaderProvider + 'static,
{
    info!("Fetch requested (blocking)");
    let service = Arc::clone(&state.service);
    let envelope = tokio::task::spawn_blocking(move || service.fetch_and_save_blocking())
        .await
        .map_err(ServerError::from)?;
    Ok(Json(envelope))
}

async fn post_reactive_handler<S, R, B, H>(
    State(state): State<AppState<S, R, B, H>>,
    Query(params): Query<PostParams>,
) -> ServerResult<Json<ResultEnvelope>>
where
    S: StudentStore + 'static,
    R: ReactiveTransport + 'static,
    B: BlockingTransport + 'static,
    H: HeaderProvider + 'static,
{
    let post_url = params.post_url.unwrap_or_default();
    info!(post_url = %post_url, "Post requested (reactive)");
    Ok(Json(state.service.post_reactive(&post_url).await))
}

async fn post_blocking_handler<S, R, B, H>(
    State(state): State<AppState<S, R, B, H>>,
    Query(params): Query<PostParams>,
) -> ServerResult<Json<ResultEnvelope>>
where
    S: StudentStore + 'static,
    R: ReactiveTransport + 'static,
    B: BlockingTransport + 'static,
    H: HeaderProvider + 'static,
{
    let post_url = params.post_url.unwrap_or_default();
    info!(post_url = %post_url, "Post requested (blocking)");
    let service = Arc::clone(&state.service);
    let envelope = tokio::task::spawn_blocking(move || service.post_blocking(&post_url))
        .await
        .map_err(ServerError::from)?;
    Ok(Json(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use rostersync_engine::{MockTransport, SyncConfig};
    use rostersync_protocol::SyncStatus;
    use rostersync_store::{MemoryStudentStore, Student};
    use serde_json::json;
    use std::time::Duration;

    type MockState = AppState<MemoryStudentStore, MockTransport, MockTransport>;

    fn create_test_state(transport: &MockTransport) -> MockState {
        let service = SyncService::new(
            SyncConfig::default(),
            MemoryStudentStore::new(),
            transport.clone(),
            transport.clone(),
        );
        AppState::new(Arc::new(service))
    }

    fn seeded_state(transport: &MockTransport, students: usize) -> MockState {
        let state = create_test_state(transport);
        for i in 0..students {
            state
                .service
                .store()
                .save(Student::new(format!("S{i}"), format!("s{i}@example.com"), 20))
                .unwrap();
        }
        state
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let server = TestServer::new(build_router(create_test_state(&MockTransport::new()))).unwrap();

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert!(!body.version.is_empty());
    }

    #[tokio::test]
    async fn fetch_routes_return_envelopes() {
        for route in ["/api/students/fetch/reactive", "/api/students/fetch/blocking"] {
            let transport = MockTransport::new();
            transport.set_fetch_response(json!([
                {"name": "John", "email": "john@example.com", "age": 20}
            ]));
            let state = create_test_state(&transport);
            let server = TestServer::new(build_router(state.clone())).unwrap();

            let response = server.get(route).await;
            response.assert_status_ok();

            let envelope: ResultEnvelope = response.json();
            assert_eq!(envelope.status(), SyncStatus::Success, "{route}");
            assert_eq!(state.service.store().len(), 1);
        }
    }

    #[tokio::test]
    async fn failed_fetch_is_still_http_200() {
        let transport = MockTransport::new();
        transport.set_fetch_status(502, json!(null));
        let server = TestServer::new(build_router(create_test_state(&transport))).unwrap();

        let response = server.get("/api/students/fetch/blocking").await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "message": "Error fetching data using blocking client: transport error: GET request failed with status code: 502",
            "status": "FAILURE"
        }));
    }

    #[tokio::test]
    async fn post_routes_use_query_url() {
        for (route, label) in [
            ("/api/students/post/reactive", "reactive client"),
            ("/api/students/post/blocking", "blocking client"),
        ] {
            let transport = MockTransport::new();
            let server = TestServer::new(build_router(seeded_state(&transport, 12))).unwrap();

            let response = server
                .post(route)
                .add_query_param("postUrl", "http://remote/ingest")
                .await;
            response.assert_status_ok();

            let envelope: ResultEnvelope = response.json();
            assert_eq!(envelope.message(), format!("Data successfully posted using {label}"));
            let calls = transport.submit_calls();
            assert_eq!(calls.len(), 2);
            assert_eq!(calls[0].url, "http://remote/ingest");
        }
    }

    #[tokio::test]
    async fn post_without_url_is_failure_envelope() {
        let transport = MockTransport::new();
        let server = TestServer::new(build_router(seeded_state(&transport, 3))).unwrap();

        let response = server.post("/api/students/post/blocking").await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "message": "Post URL is null or empty",
            "status": "FAILURE"
        }));
        assert!(transport.submit_calls().is_empty());
    }

    #[tokio::test]
    async fn slow_multi_batch_post_runs_to_completion() {
        for route in ["/api/students/post/reactive", "/api/students/post/blocking"] {
            let transport = MockTransport::new();
            transport.set_delay(Duration::from_millis(100));
            let server = TestServer::new(build_router(seeded_state(&transport, 30))).unwrap();

            let response = server
                .post(route)
                .add_query_param("postUrl", "http://remote/ingest")
                .await;
            response.assert_status_ok();

            let envelope: ResultEnvelope = response.json();
            assert_eq!(envelope.status(), SyncStatus::Success, "{route}");
            assert_eq!(transport.submit_calls().len(), 3, "{route}");
        }
    }
}
