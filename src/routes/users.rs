use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::{require_present, AppJson, Data};
use crate::{error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create_user", post(create_user))
        .route(
            "/:email",
            get(show_user).patch(update_user).delete(delete_user),
        )
        .route("/:email/reset_password", post(reset_password))
        .route("/:email/change_password", post(change_password))
}

#[derive(Deserialize)]
struct CreateUserRequest {
    email: String,
    name: String,
}

#[derive(Deserialize)]
struct UpdateUserRequest {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest {
    old_password: String,
    new_password: String,
}

async fn show_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.users.get(&email).await?;
    Ok(Json(Data::new(user)))
}

async fn create_user(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_present("email", &body.email)?;
    require_present("name", &body.name)?;
    let issued = state.users.store(&body.name, &body.email).await?;
    Ok((StatusCode::CREATED, Json(Data::new(issued))))
}

async fn update_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    AppJson(body): AppJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_present("name", &body.name)?;
    let user = state.users.update(&email, &body.name).await?;
    Ok(Json(Data::new(user)))
}

async fn reset_password(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let password = state.users.reset_password(&email).await?;
    Ok(Json(Data::new(json!({ "temporaryPassword": password }))))
}

async fn change_password(
    State(state): State<AppState>,
    Path(email): Path<String>,
    AppJson(body): AppJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_present("newPassword", &body.new_password)?;
    state
        .users
        .change_password(&email, &body.old_password, &body.new_password)
        .await?;
    Ok(Json(Data::new("Password updated successfully")))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<StatusCode, AppError> {
    state.users.delete(&email).await?;
    Ok(StatusCode::NO_CONTENT)
}
