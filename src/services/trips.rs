use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::{
    error::AppError,
    models::{
        itinerary::sort_itinerary,
        trip::{Trip, TripInput},
    },
    repository::{RepositoryError, TripRepository},
};

/// Trip lifecycle rules on top of a [`TripRepository`].
///
/// Holds nothing but the repository handle. Concurrent writes to one trip are
/// not coordinated: the last write wins.
#[derive(Clone)]
pub struct TripService {
    repository: Arc<dyn TripRepository>,
}

fn missing_trip(id: &str) -> AppError {
    AppError::not_found(format!("The trip with id {id} does not exist"))
}

fn storage_failure(err: RepositoryError) -> AppError {
    AppError::internal(format!("unexpected storage error: {err}"))
}

impl TripService {
    pub fn new(repository: Arc<dyn TripRepository>) -> Self {
        Self { repository }
    }

    /// Trips owned by `owner_id`. Owning no trips at all is reported as
    /// `NotFound`, never as an empty list.
    pub async fn get_all(&self, owner_id: &str) -> Result<Vec<Trip>, AppError> {
        debug!(owner = %owner_id, "listing trips");
        let trips = self.repository.get_all(owner_id).await.map_err(|err| {
            error!(owner = %owner_id, "listing trips failed: {err}");
            storage_failure(err)
        })?;

        if trips.is_empty() {
            return Err(AppError::not_found("There are no trips for this user"));
        }
        Ok(trips)
    }

    pub async fn get(&self, id: &str) -> Result<Trip, AppError> {
        self.repository.get(id).await.map_err(|err| {
            if !matches!(err, RepositoryError::NotFound(_)) {
                warn!(trip_id = %id, "trip lookup failed: {err}");
            }
            missing_trip(id)
        })
    }

    /// Creates a trip. The itinerary is stored in the order given.
    pub async fn store(&self, input: TripInput) -> Result<Trip, AppError> {
        debug!(owner = %input.owner, "storing trip");
        self.repository
            .save(Trip::from_input(input))
            .await
            .map_err(|err| AppError::conflict(err.to_string()))
    }

    /// Replaces every field of an existing trip and reorders its itinerary.
    pub async fn update(&self, id: &str, input: TripInput) -> Result<Trip, AppError> {
        let mut trip = self.get(id).await?;
        trip.id = id.to_string();
        trip.replace_with(input);
        sort_itinerary(&mut trip.itinerary);

        self.repository
            .update(trip.clone())
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound(_) => missing_trip(id),
                other => {
                    error!(trip_id = %id, "trip update failed: {other}");
                    storage_failure(other)
                }
            })?;

        debug!(trip_id = %id, legs = trip.itinerary.len(), "updated trip");
        Ok(trip)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.repository.delete(id).await.map_err(|err| {
            if !matches!(err, RepositoryError::NotFound(_)) {
                warn!(trip_id = %id, "trip delete failed: {err}");
            }
            missing_trip(id)
        })
    }
}
