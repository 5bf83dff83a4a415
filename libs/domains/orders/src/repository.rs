use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::OrderResult;
use crate::models::{Order, OrderFilter};

/// Data access for orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Allocate the next order id. Ids strictly increase.
    async fn next_id(&self) -> OrderResult<i64>;

    async fn create(&self, order: Order) -> OrderResult<Order>;

    async fn get_by_id(&self, id: i64) -> OrderResult<Option<Order>>;

    /// Orders matching `filter`, newest first, honoring limit and offset.
    async fn list(&self, filter: &OrderFilter) -> OrderResult<Vec<Order>>;

    /// Number of orders matching `filter`, ignoring limit and offset.
    async fn count(&self, filter: &OrderFilter) -> OrderResult<u64>;

    /// Every order placed by the account `customer_id`, newest first.
    async fn list_by_customer(&self, customer_id: &str) -> OrderResult<Vec<Order>>;

    /// Replace the stored order. `None` when it does not exist.
    async fn update(&self, order: Order) -> OrderResult<Option<Order>>;
}

/// Process-local repository used by tests and local development.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<BTreeMap<i64, Order>>>,
    sequence: Arc<AtomicI64>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn next_id(&self) -> OrderResult<i64> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn create(&self, order: Order) -> OrderResult<Order> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get_by_id(&self, id: i64) -> OrderResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: &OrderFilter) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .rev()
            .filter(|o| filter.matches(o))
            .skip(filter.offset as usize)
            .take(filter.limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &OrderFilter) -> OrderResult<u64> {
        let orders = self.orders.read().await;
        Ok(orders.values().filter(|o| filter.matches(o)).count() as u64)
    }

    async fn list_by_customer(&self, customer_id: &str) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .rev()
            .filter(|o| o.is_owned_by(customer_id))
            .cloned()
            .collect())
    }

    async fn update(&self, order: Order) -> OrderResult<Option<Order>> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(&order.id) {
            Some(stored) => {
                *stored = order.clone();
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateOrder, CustomerSnapshot, LineItem, OrderStatus};
    use uuid::Uuid;

    fn order(id: i64, customer: &str) -> Order {
        Order::new(
            id,
            customer,
            CreateOrder {
                user: CustomerSnapshot {
                    email: format!("{customer}@example.com"),
                    ..CustomerSnapshot::default()
                },
                products: vec![LineItem {
                    product_id: Uuid::now_v7(),
                    qty: 1,
                    price: 10.0,
                    ..LineItem::default()
                }],
                total_price: 10.0,
            },
        )
    }

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let repo = InMemoryOrderRepository::new();
        let a = repo.next_id().await.unwrap();
        let b = repo.next_id().await.unwrap();
        assert_eq!(a, 1);
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paged() {
        let repo = InMemoryOrderRepository::new();
        for id in 1..=5 {
            repo.create(order(id, "buyer")).await.unwrap();
        }

        let filter = OrderFilter {
            limit: 2,
            offset: 1,
            ..OrderFilter::default()
        };
        let ids: Vec<i64> = repo.list(&filter).await.unwrap().iter().map(|o| o.id).collect();

        assert_eq!(ids, vec![4, 3]);
        assert_eq!(repo.count(&filter).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_list_by_customer_and_status_filter() {
        let repo = InMemoryOrderRepository::new();
        repo.create(order(1, "a")).await.unwrap();
        let mut paid = order(2, "b");
        paid.status = OrderStatus::Paid;
        repo.create(paid).await.unwrap();
        repo.create(order(3, "a")).await.unwrap();

        let mine: Vec<i64> = repo
            .list_by_customer("a")
            .await
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(mine, vec![3, 1]);
        assert!(repo.list_by_customer("A").await.unwrap().is_empty());

        let filter = OrderFilter {
            status: Some(OrderStatus::Paid),
            ..OrderFilter::default()
        };
        let paid_orders = repo.list(&filter).await.unwrap();
        assert_eq!(paid_orders.len(), 1);
        assert_eq!(paid_orders[0].id, 2);
    }

    #[tokio::test]
    async fn test_update_missing_order_is_none() {
        let repo = InMemoryOrderRepository::new();
        assert!(repo.update(order(9, "a")).await.unwrap().is_none());
    }
}
