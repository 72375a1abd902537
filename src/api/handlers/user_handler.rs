//! User handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::domain::UserDto;
use crate::errors::{AppResult, OptionExt, ProblemDetails};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_active_users))
        .route("/:username", get(get_user_by_username))
        .route("/email/:email", get(get_user_by_email))
}

/// List all active users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Active users with their roles", body = Vec<UserDto>),
        (status = 500, description = "Query failed", body = ProblemDetails, content_type = "application/problem+json")
    )
)]
pub async fn get_active_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserDto>>> {
    let users = state.user_queries.get_active_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Get user by username
#[utoipa::path(
    get,
    path = "/users/{username}",
    tag = "Users",
    params(
        ("username" = String, Path, description = "Exact username")
    ),
    responses(
        (status = 200, description = "User with roles", body = UserDto),
        (status = 404, description = "No user with that username"),
        (status = 500, description = "Query failed", body = ProblemDetails, content_type = "application/problem+json")
    )
)]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserDto>> {
    let user = state
        .user_queries
        .get_by_username(&username)
        .await?
        .ok_or_not_found()?;

    Ok(Json(UserDto::from(user)))
}

/// Get user by email
#[utoipa::path(
    get,
    path = "/users/email/{email}",
    tag = "Users",
    params(
        ("email" = String, Path, description = "Exact email address")
    ),
    responses(
        (status = 200, description = "User with roles", body = UserDto),
        (status = 404, description = "No user with that email"),
        (status = 500, description = "Query failed", body = ProblemDetails, content_type = "application/problem+json")
    )
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserDto>> {
    let user = state
        .user_queries
        .get_by_email(&email)
        .await?
        .ok_or_not_found()?;

    Ok(Json(UserDto::from(user)))
}
