//! Storage ports for trips and users.
//!
//! Services only see these traits; [`sqlite`] holds the adapters used by the
//! running server.

pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{trip::Trip, user::User};

pub use sqlite::{SqliteTripRepository, SqliteUserRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no document matches {0}")]
    NotFound(String),
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("malformed document: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Trips owned by `owner`. An empty list is a normal outcome.
    async fn get_all(&self, owner: &str) -> Result<Vec<Trip>, RepositoryError>;

    async fn get(&self, id: &str) -> Result<Trip, RepositoryError>;

    /// Persists a new trip and returns it with its assigned id.
    async fn save(&self, trip: Trip) -> Result<Trip, RepositoryError>;

    /// Replaces the stored document for `trip.id` wholesale.
    async fn update(&self, trip: Trip) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, email: &str) -> Result<User, RepositoryError>;

    /// Persists a new user and returns it with its assigned id.
    async fn save(&self, user: User) -> Result<User, RepositoryError>;

    async fn update(&self, user: User) -> Result<(), RepositoryError>;

    async fn set_password(&self, email: &str, password_hash: &str)
        -> Result<(), RepositoryError>;

    async fn delete(&self, email: &str) -> Result<(), RepositoryError>;
}
