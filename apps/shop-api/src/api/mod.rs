//! HTTP surface of the shop API.

pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use axum::Router;
use mongodb::Database;

use crate::state::AppState;

/// Every API route with its full prefix.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/api/product", products::router(state))
        .nest("/api/users", users::router(state))
        .nest("/auth", users::auth_router(state))
        .nest("/api/orders", orders::router(state))
        .merge(health::router(state.clone()))
}

/// Create the indexes of every collection the API uses.
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    products::init_indexes(db).await?;
    users::init_indexes(db).await?;
    orders::init_indexes(db).await?;
    Ok(())
}
