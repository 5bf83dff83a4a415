//! MongoDB implementation of OrderRepository

use async_trait::async_trait;
use database::mongodb::next_sequence;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use tracing::instrument;

use crate::error::OrderResult;
use crate::models::{Order, OrderFilter};
use crate::repository::OrderRepository;

pub const ORDERS_COLLECTION: &str = "orders";

/// Counter name in the shared `counters` collection.
const ORDER_SEQUENCE: &str = "orders";

pub struct MongoOrderRepository {
    db: Database,
    collection: Collection<Order>,
}

impl MongoOrderRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, ORDERS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection::<Order>(collection_name),
        }
    }

    pub async fn init_indexes(&self) -> OrderResult<()> {
        let index = |keys, name: &str| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        };

        let indexes = vec![
            index(doc! { "customerId": 1, "_id": -1 }, "idx_customer_id"),
            index(doc! { "user.email": 1 }, "idx_user_email"),
            index(doc! { "status": 1, "archived": 1 }, "idx_status_archived"),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Order indexes created successfully");
        Ok(())
    }

    fn build_filter(filter: &OrderFilter) -> Document {
        let mut doc = doc! {};

        if let Some(status) = filter.status {
            doc.insert("status", status.to_string());
        }

        if let Some(archived) = filter.archived {
            doc.insert("archived", archived);
        }

        if let Some(ref email) = filter.email {
            doc.insert("user.email", email.trim().to_lowercase());
        }

        doc
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    #[instrument(skip(self))]
    async fn next_id(&self) -> OrderResult<i64> {
        Ok(next_sequence(&self.db, ORDER_SEQUENCE).await?)
    }

    #[instrument(skip(self, order), fields(order_id = order.id))]
    async fn create(&self, order: Order) -> OrderResult<Order> {
        self.collection.insert_one(&order).await?;

        tracing::info!(order_id = order.id, "Order created successfully");
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> OrderResult<Option<Order>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &OrderFilter) -> OrderResult<Vec<Order>> {
        let cursor = self
            .collection
            .find(Self::build_filter(filter))
            .sort(doc! { "_id": -1 })
            .skip(filter.offset)
            .limit(filter.limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: &OrderFilter) -> OrderResult<u64> {
        Ok(self
            .collection
            .count_documents(Self::build_filter(filter))
            .await?)
    }

    #[instrument(skip(self))]
    async fn list_by_customer(&self, customer_id: &str) -> OrderResult<Vec<Order>> {
        let cursor = self
            .collection
            .find(doc! { "customerId": customer_id })
            .sort(doc! { "_id": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, order), fields(order_id = order.id))]
    async fn update(&self, order: Order) -> OrderResult<Option<Order>> {
        let result = self
            .collection
            .replace_one(doc! { "_id": order.id }, &order)
            .await?;

        if result.matched_count == 0 {
            return Ok(None);
        }

        tracing::info!(order_id = order.id, status = %order.status, "Order updated successfully");
        Ok(Some(order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    #[test]
    fn test_build_filter_empty() {
        let filter = MongoOrderRepository::build_filter(&OrderFilter::default());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_build_filter_all_fields() {
        let filter = MongoOrderRepository::build_filter(&OrderFilter {
            status: Some(OrderStatus::Shipped),
            archived: Some(false),
            email: Some(" Buyer@Example.com ".into()),
            ..OrderFilter::default()
        });

        assert_eq!(filter.get_str("status").unwrap(), "SHIPPED");
        assert!(!filter.get_bool("archived").unwrap());
        assert_eq!(filter.get_str("user.email").unwrap(), "buyer@example.com");
    }
}
