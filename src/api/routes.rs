use std::any::Any as PanicPayload;
use std::sync::Arc;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
};

use super::error::AppError;
use super::health::health_check;
use super::users::user_routes;
use crate::middleware::request_logger;
use crate::services::UserService;

pub fn create_routes(user_service: UserService) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(user_routes(Arc::new(user_service)))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::from_fn(request_logger))
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(cors_layer()),
        )
}

async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Turns a panicking handler into the regular 500 body so the request
/// logger still sees the failure.
fn handle_panic(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let message = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Panic(message).into_response()
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
