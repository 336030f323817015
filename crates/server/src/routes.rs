use std::sync::Arc;

use axum::http::{Method, Uri};
use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::restaurant::repository::RestaurantRepository;
use service::restaurant::RestaurantService;

use crate::errors::{ApiError, ErrorCode};
use crate::openapi::ApiDoc;
use crate::restaurants;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub restaurants: Arc<RestaurantService<dyn RestaurantRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn RestaurantRepository>) -> Self {
        Self { restaurants: Arc::new(RestaurantService::new(repo)) }
    }
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn no_route(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        axum::http::StatusCode::NOT_FOUND,
        ErrorCode::Exception,
        format!("No endpoint {} {}.", method, uri.path()),
    )
}

/// Build the application router with CORS and request tracing.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let restaurant_routes = Router::new()
        .route(
            "/restaurant",
            get(restaurants::list).post(restaurants::create).fallback(restaurants::not_supported),
        )
        .route("/restaurant/query", get(restaurants::query).fallback(restaurants::not_supported))
        .route("/restaurant/sort", get(restaurants::sorted).fallback(restaurants::not_supported))
        .route(
            "/restaurant/:id",
            get(restaurants::get_one)
                .put(restaurants::update)
                .delete(restaurants::delete)
                .fallback(restaurants::not_supported),
        );

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(restaurant_routes)
        .fallback(no_route)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
