//! Account and login routes backed by the `users` collection.

use axum::Router;
use domain_users::{MongoUserRepository, UserService, auth_handlers, handlers};
use mongodb::Database;

use crate::state::AppState;

fn service(state: &AppState) -> UserService<MongoUserRepository> {
    UserService::new(MongoUserRepository::new(&state.db))
}

pub fn router(state: &AppState) -> Router {
    handlers::router(service(state), state.auth.clone())
}

pub fn auth_router(state: &AppState) -> Router {
    auth_handlers::router(service(state), state.auth.clone())
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoUserRepository::new(db).init_indexes().await?;
    Ok(())
}
