use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteQueryResult, Row};
use tracing::debug;
use uuid::Uuid;

use super::{RepositoryError, TripRepository, UserRepository};
use crate::{
    db::DbPool,
    models::{trip::Trip, user::User},
};

/// Trips stored as JSON documents keyed by id, with the owner pulled out into
/// its own indexed column for listing.
#[derive(Clone)]
pub struct SqliteTripRepository {
    pool: DbPool,
}

impl SqliteTripRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// The id lives in its own column and never inside the document.
fn encode_trip(trip: &Trip) -> Result<String, RepositoryError> {
    let mut document = trip.clone();
    document.id.clear();
    Ok(serde_json::to_string(&document)?)
}

fn decode_trip(id: String, document: &str) -> Result<Trip, RepositoryError> {
    let mut trip: Trip = serde_json::from_str(document)?;
    trip.id = id;
    Ok(trip)
}

fn map_insert_error(err: sqlx::Error, key: &str) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::Duplicate(key.to_string())
        }
        _ => RepositoryError::Database(err),
    }
}

fn require_match(result: SqliteQueryResult, key: &str) -> Result<(), RepositoryError> {
    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound(key.to_string()));
    }
    Ok(())
}

#[async_trait]
impl TripRepository for SqliteTripRepository {
    async fn get_all(&self, owner: &str) -> Result<Vec<Trip>, RepositoryError> {
        let rows = sqlx::query("SELECT id, document FROM trips WHERE owner = ? ORDER BY rowid")
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                let document: String = row.try_get("document")?;
                decode_trip(id, &document)
            })
            .collect()
    }

    async fn get(&self, id: &str) -> Result<Trip, RepositoryError> {
        let row = sqlx::query("SELECT document FROM trips WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        let document: String = row.try_get("document")?;
        decode_trip(id.to_string(), &document)
    }

    async fn save(&self, mut trip: Trip) -> Result<Trip, RepositoryError> {
        trip.id = Uuid::new_v4().to_string();
        let document = encode_trip(&trip)?;

        sqlx::query("INSERT INTO trips (id, owner, document, created_at) VALUES (?, ?, ?, ?)")
            .bind(&trip.id)
            .bind(&trip.owner)
            .bind(&document)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|err| map_insert_error(err, &trip.id))?;

        debug!(trip_id = %trip.id, "inserted trip document");
        Ok(trip)
    }

    async fn update(&self, trip: Trip) -> Result<(), RepositoryError> {
        let document = encode_trip(&trip)?;
        let result = sqlx::query("UPDATE trips SET owner = ?, document = ? WHERE id = ?")
            .bind(&trip.owner)
            .bind(&document)
            .bind(&trip.id)
            .execute(&self.pool)
            .await?;
        require_match(result, &trip.id)
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(trip_id = %id, deleted = result.rows_affected(), "deleted trip documents");
        require_match(result, id)
    }
}

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get(&self, email: &str) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(email.to_string()))
    }

    async fn save(&self, mut user: User) -> Result<User, RepositoryError> {
        user.id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| map_insert_error(err, &user.email))?;

        debug!(user_id = %user.id, "inserted user");
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET name = ?, password_hash = ? WHERE email = ?")
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(&user.email)
            .execute(&self.pool)
            .await?;
        require_match(result, &user.email)
    }

    async fn set_password(&self, email: &str, password_hash: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE email = ?")
            .bind(password_hash)
            .bind(email)
            .execute(&self.pool)
            .await?;
        require_match(result, email)
    }

    async fn delete(&self, email: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE email = ?")
            .bind(email)
            .execute(&self.pool)
            .await?;
        require_match(result, email)
    }
}
