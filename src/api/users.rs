use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;

use super::error::AppError;
use crate::models::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::services::UserService;

type UserId = WithRejection<Path<i32>, AppError>;

pub fn user_routes(user_service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/v1/users", get(list_users).post(create_user))
        .route("/api/v1/users/", get(list_users).post(create_user))
        .route(
            "/api/v1/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(user_service)
}

/// Create a user from a `{name, dob}` body
pub async fn create_user(
    State(user_service): State<Arc<UserService>>,
    WithRejection(Json(request), _): WithRejection<Json<CreateUserRequest>, AppError>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let input = request.into_input()?;

    let user = user_service.create_user(input).await?;

    tracing::info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(user_service): State<Arc<UserService>>,
    WithRejection(Path(id), _): UserId,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service.get_user(id).await?;

    tracing::info!(user_id = user.id, "user retrieved");
    Ok(Json(user))
}

pub async fn list_users(
    State(user_service): State<Arc<UserService>>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user_service.list_users().await?;

    tracing::info!(count = users.len(), "users listed");
    Ok(Json(users))
}

/// Replace a user's name and date of birth. The body is validated before
/// storage is touched.
pub async fn update_user(
    State(user_service): State<Arc<UserService>>,
    WithRejection(Path(id), _): UserId,
    WithRejection(Json(request), _): WithRejection<Json<UpdateUserRequest>, AppError>,
) -> Result<Json<UserResponse>, AppError> {
    let input = request.into_input()?;

    let user = user_service.update_user(id, input).await?;

    tracing::info!(user_id = user.id, "user updated");
    Ok(Json(user))
}

pub async fn delete_user(
    State(user_service): State<Arc<UserService>>,
    WithRejection(Path(id), _): UserId,
) -> Result<StatusCode, AppError> {
    user_service.delete_user(id).await?;

    tracing::info!(user_id = id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
