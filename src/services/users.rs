use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::{
    auth::{generate_password, hash_password, verify_password, TEMPORARY_PASSWORD_LEN},
    error::AppError,
    models::user::{IssuedUser, User},
    repository::{RepositoryError, UserRepository},
};

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

fn missing_user(email: &str) -> AppError {
    AppError::not_found(format!("The user with email {email} does not exist"))
}

fn storage_failure(err: RepositoryError) -> AppError {
    AppError::internal(format!("unexpected storage error: {err}"))
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn get(&self, email: &str) -> Result<User, AppError> {
        self.repository.get(email).await.map_err(|err| {
            if !matches!(err, RepositoryError::NotFound(_)) {
                warn!(%email, "user lookup failed: {err}");
            }
            missing_user(email)
        })
    }

    /// Registers a user under a freshly generated password, which is returned
    /// alongside the user and never stored in clear.
    pub async fn store(&self, name: &str, email: &str) -> Result<IssuedUser, AppError> {
        match self.repository.get(email).await {
            Ok(_) => return Err(AppError::conflict("User already in database")),
            Err(RepositoryError::NotFound(_)) => {}
            Err(err) => {
                error!(%email, "user lookup before insert failed: {err}");
                return Err(storage_failure(err));
            }
        }

        let temporary_password = generate_password(TEMPORARY_PASSWORD_LEN);
        let user = User::new(name, email, hash_password(&temporary_password)?);
        let user = self.repository.save(user).await.map_err(|err| match err {
            RepositoryError::Duplicate(_) => AppError::conflict("User already in database"),
            other => {
                error!(%email, "user insert failed: {other}");
                storage_failure(other)
            }
        })?;

        debug!(user_id = %user.id, "registered user");
        Ok(IssuedUser {
            user,
            temporary_password,
        })
    }

    pub async fn update(&self, email: &str, name: &str) -> Result<User, AppError> {
        let mut user = self.get(email).await?;
        user.name = name.to_string();

        self.repository
            .update(user.clone())
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound(_) => missing_user(email),
                other => storage_failure(other),
            })?;
        Ok(user)
    }

    /// Replaces the password with a new random one and returns it.
    pub async fn reset_password(&self, email: &str) -> Result<String, AppError> {
        let password = generate_password(TEMPORARY_PASSWORD_LEN);
        self.repository
            .set_password(email, &hash_password(&password)?)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound(_) => missing_user(email),
                other => storage_failure(other),
            })?;

        debug!(%email, "password reset");
        Ok(password)
    }

    pub async fn change_password(
        &self,
        email: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self.get(email).await?;
        if !verify_password(old_password, &user.password_hash) {
            return Err(AppError::unauthorized("Wrong user and/or password"));
        }

        self.repository
            .set_password(email, &hash_password(new_password)?)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound(_) => missing_user(email),
                other => storage_failure(other),
            })
    }

    pub async fn delete(&self, email: &str) -> Result<(), AppError> {
        self.repository.delete(email).await.map_err(|err| {
            if !matches!(err, RepositoryError::NotFound(_)) {
                warn!(%email, "user delete failed: {err}");
            }
            missing_user(email)
        })
    }
}
