//! Shared application state handed to the API module.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Shares the driver's connection pool
    pub mongo_client: Client,
    pub db: Database,
    pub auth: JwtAuth,
}
