//! Order Service - Business logic layer

use axum_helpers::JwtClaims;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{CreateOrder, Order, OrderFilter, OrderList, OrderStatus};
use crate::repository::OrderRepository;

pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Place an order owned by the caller's account.
    ///
    /// Customers may only order under their own email; admins may fill in
    /// any buyer snapshot. `totalPrice` must equal Σ qty × price within
    /// [`TOTAL_TOLERANCE`].
    ///
    /// [`TOTAL_TOLERANCE`]: crate::models::TOTAL_TOLERANCE
    #[instrument(skip(self, claims, input), fields(caller = %claims.sub))]
    pub async fn create_order(&self, claims: &JwtClaims, input: CreateOrder) -> OrderResult<Order> {
        input.validate()?;

        if !claims.is_admin() && !input.user.email.trim().eq_ignore_ascii_case(&claims.email) {
            return Err(OrderError::Forbidden(
                "Orders can only be placed for your own account".into(),
            ));
        }

        if !input.total_matches() {
            return Err(OrderError::TotalMismatch {
                expected: input.computed_total(),
                submitted: input.total_price,
            });
        }

        let id = self.repository.next_id().await?;
        self.repository
            .create(Order::new(id, claims.sub.clone(), input))
            .await
    }

    /// Fetch an order visible to the caller: its owner or an admin.
    #[instrument(skip(self, claims))]
    pub async fn get_order(&self, claims: &JwtClaims, id: i64) -> OrderResult<Order> {
        let order = self.find(id).await?;
        ensure_visible(claims, &order)?;
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self, filter: OrderFilter) -> OrderResult<OrderList> {
        let filter = filter.normalized();
        let (orders, total) = tokio::try_join!(
            self.repository.list(&filter),
            self.repository.count(&filter)
        )?;
        Ok(OrderList { orders, total })
    }

    #[instrument(skip(self, claims), fields(caller = %claims.sub))]
    pub async fn my_orders(&self, claims: &JwtClaims) -> OrderResult<Vec<Order>> {
        self.repository.list_by_customer(&claims.sub).await
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> OrderResult<Order> {
        self.modify(id, |order| order.status = status).await
    }

    #[instrument(skip(self))]
    pub async fn archive(&self, id: i64) -> OrderResult<Order> {
        self.modify(id, |order| order.archived = true).await
    }

    /// Record the payment reference for an order owned by the caller.
    #[instrument(skip(self, claims, reference))]
    pub async fn attach_payment(
        &self,
        claims: &JwtClaims,
        id: i64,
        reference: String,
    ) -> OrderResult<Order> {
        let mut order = self.find(id).await?;
        ensure_visible(claims, &order)?;

        order.payment_reference = Some(reference);
        order.touch();
        self.save(order).await
    }

    async fn find(&self, id: i64) -> OrderResult<Order> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    async fn modify(&self, id: i64, change: impl FnOnce(&mut Order)) -> OrderResult<Order> {
        let mut order = self.find(id).await?;
        change(&mut order);
        order.touch();
        self.save(order).await
    }

    async fn save(&self, order: Order) -> OrderResult<Order> {
        let id = order.id;
        self.repository
            .update(order)
            .await?
            .ok_or(OrderError::NotFound(id))
    }
}

fn ensure_visible(claims: &JwtClaims, order: &Order) -> OrderResult<()> {
    if claims.is_admin() || order.is_owned_by(&claims.sub) {
        Ok(())
    } else {
        Err(OrderError::Forbidden("This order belongs to another user".into()))
    }
}

impl<R: OrderRepository> Clone for OrderService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
