//! REST surface for the person service, built on axum.
//!
//! Three routes, mapped onto the service operations:
//!
//! - `POST /person/create` creates an aggregate
//! - `GET  /person/:id/info` fetches one aggregate
//! - `GET  /person` pages through the list (`page`, `limit` query params)
//!
//! A missing person maps to 404; every other service failure maps to 500
//! with an `{"error": ...}` body.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use person_store::{PersonView, StoreError};

use crate::errors::WiringError;
use crate::service::PersonOperations;

const DEFAULT_PAGE: i64 = 0;
const DEFAULT_LIMIT: i64 = 25;

/// Shared application state for REST handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn PersonOperations>,
}

/// Paging query parameters, kept as raw strings so unparsable values fall
/// back to the defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<String>,
    limit: Option<String>,
}

fn parse_or(value: Option<&str>, default: i64) -> i64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Build the person router on top of the given state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/person", get(list_persons))
        .route("/person/create", post(create_person))
        .route("/person/:id/info", get(get_person))
        .with_state(state)
}

async fn create_person(
    State(state): State<AppState>,
    Json(req): Json<PersonView>,
) -> Response {
    match state.service.create(req).await {
        Ok(person) => (StatusCode::OK, Json(person)).into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &err),
    }
}

async fn get_person(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    match state.service.get_by_id(id).await {
        Ok(person) => (StatusCode::OK, Json(person)).into_response(),
        Err(err @ StoreError::NotFound) => error_response(StatusCode::NOT_FOUND, &err),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &err),
    }
}

async fn list_persons(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    let page = parse_or(query.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_or(query.limit.as_deref(), DEFAULT_LIMIT);

    match state.service.get_all(page, limit).await {
        Ok(persons) => (
            StatusCode::OK,
            Json(json!({
                "content": persons,
                "page": page,
                "size": limit,
            })),
        )
            .into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &err),
    }
}

fn error_response(status: StatusCode, err: &StoreError) -> Response {
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

/// REST server for the person service
pub struct RestServer {
    router: Router,
    bind_addr: SocketAddr,
}

impl std::fmt::Debug for RestServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestServer")
            .field("bind_addr", &self.bind_addr)
            .finish_non_exhaustive()
    }
}

impl RestServer {
    pub fn builder() -> RestServerBuilder {
        RestServerBuilder::default()
    }

    /// Bind and serve until a shutdown signal arrives.
    pub async fn start(self) -> anyhow::Result<()> {
        tracing::info!("Starting REST server on {}", self.bind_addr);

        axum::Server::bind(&self.bind_addr)
            .serve(self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

/// Builder for [`RestServer`]. The service is required; `build` fails with
/// [`WiringError::MissingService`] rather than panicking when it is absent.
pub struct RestServerBuilder {
    service: Option<Arc<dyn PersonOperations>>,
    bind_addr: SocketAddr,
}

impl Default for RestServerBuilder {
    fn default() -> Self {
        Self {
            service: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl RestServerBuilder {
    pub fn service(mut self, service: Arc<dyn PersonOperations>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    pub fn build(self) -> Result<RestServer, WiringError> {
        let service = self.service.ok_or(WiringError::MissingService)?;

        let router = create_router(AppState { service }).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        );

        Ok(RestServer {
            router,
            bind_addr: self.bind_addr,
        })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::doubles::{FailingStore, MemoryStore};
    use crate::service::PersonService;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router_over(store: Arc<dyn person_store::PersonStorage>) -> Router {
        let service = PersonService::builder().store(store).build().unwrap();
        create_router(AppState {
            service: Arc::new(service),
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn create_request() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/person/create")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{
                    "name": "name", "age": 15, "phone_number": "111-111-1111",
                    "city": "city", "state": "state",
                    "street1": "str1", "street2": "str2", "zip_code": "1234"
                }"#,
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_stored_view() {
        let router = router_over(Arc::new(MemoryStore::default()));

        let response = router.oneshot(create_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["name"], "name");
        assert_eq!(body["phone_number"], "111-111-1111");
        assert_eq!(body["zip_code"], "1234");
        assert_eq!(body["id"], 1);
    }

    #[tokio::test]
    async fn test_get_unknown_person_is_404() {
        let router = router_over(Arc::new(MemoryStore::default()));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/person/99/info")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "not found");
    }

    #[tokio::test]
    async fn test_storage_failure_is_500() {
        let router = router_over(Arc::new(FailingStore));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/person/1/info")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("Database error"));
    }

    #[tokio::test]
    async fn test_list_defaults_bad_query_params() {
        let store = Arc::new(MemoryStore::default());
        let router = router_over(store);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/person?page=abc&limit=xyz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["page"], 0);
        assert_eq!(body["size"], 25);
        assert_eq!(body["content"], serde_json::json!([]));
    }

    #[test]
    fn test_build_without_service_fails() {
        let err = RestServer::builder().build().unwrap_err();
        assert!(matches!(err, WiringError::MissingService));
    }
}
