//! Order routes backed by the `orders` collection.

use axum::Router;
use domain_orders::{MongoOrderRepository, OrderService, handlers};
use mongodb::Database;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoOrderRepository::new(&state.db);
    handlers::router(OrderService::new(repository), state.auth.clone())
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoOrderRepository::new(db).init_indexes().await?;
    Ok(())
}
