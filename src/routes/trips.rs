use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{require_present, AppJson, Data};
use crate::{error::AppError, models::trip::TripInput, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route(
            "/:id",
            get(show_trip).patch(update_trip).delete(delete_trip),
        )
}

#[derive(Deserialize)]
struct ListParams {
    user_id: Option<String>,
}

fn validate(input: &TripInput) -> Result<(), AppError> {
    require_present("name", &input.name)?;
    require_present("description", &input.description)?;
    require_present("start", &input.start)?;
    require_present("end", &input.end)?;
    require_present("owner", &input.owner)
}

async fn list_trips(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let owner = params
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("user_id query parameter is required"))?;
    let trips = state.trips.get_all(&owner).await?;
    Ok(Json(Data::new(trips)))
}

async fn show_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state.trips.get(&id).await?;
    Ok(Json(Data::new(trip)))
}

async fn create_trip(
    State(state): State<AppState>,
    AppJson(input): AppJson<TripInput>,
) -> Result<impl IntoResponse, AppError> {
    validate(&input)?;
    let trip = state.trips.store(input).await?;
    Ok((StatusCode::CREATED, Json(Data::new(trip))))
}

async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<TripInput>,
) -> Result<impl IntoResponse, AppError> {
    validate(&input)?;
    let trip = state.trips.update(&id, input).await?;
    Ok(Json(Data::new(trip)))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.trips.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
