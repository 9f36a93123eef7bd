use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::DbPool,
    repository::{SqliteTripRepository, SqliteUserRepository},
    services::{TripService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub trips: TripService,
    pub users: UserService,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool) -> Self {
        let trips = TripService::new(Arc::new(SqliteTripRepository::new(db.clone())));
        let users = UserService::new(Arc::new(SqliteUserRepository::new(db.clone())));
        Self {
            config,
            db,
            trips,
            users,
        }
    }
}
