//! HTTP handlers for `/api/orders`

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    routing::{get, put},
};
use axum_helpers::{
    AdminUser, AppError, AuthUser, JwtAuth, ValidatedJson,
    errors::responses::{
        BadRequestQueryResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::OrderResult;
use crate::models::{
    AttachPayment, CreateOrder, CustomerSnapshot, LineItem, Order, OrderFilter, OrderList,
    OrderStatus, UpdateStatus,
};
use crate::repository::OrderRepository;
use crate::service::OrderService;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_order,
        list_orders,
        my_orders,
        get_order,
        update_status,
        archive_order,
        attach_payment,
    ),
    components(
        schemas(
            Order, CreateOrder, CustomerSnapshot, LineItem, OrderStatus, OrderList,
            UpdateStatus, AttachPayment
        ),
        responses(
            BadRequestQueryResponse,
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Orders", description = "Order placement and fulfilment")
    )
)]
pub struct ApiDoc;

pub struct OrdersState<R: OrderRepository> {
    pub service: Arc<OrderService<R>>,
    pub auth: JwtAuth,
}

impl<R: OrderRepository> Clone for OrdersState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            auth: self.auth.clone(),
        }
    }
}

impl<R: OrderRepository> FromRef<OrdersState<R>> for JwtAuth {
    fn from_ref(state: &OrdersState<R>) -> Self {
        state.auth.clone()
    }
}

pub fn router<R: OrderRepository + 'static>(service: OrderService<R>, auth: JwtAuth) -> Router {
    let state = OrdersState {
        service: Arc::new(service),
        auth,
    };

    Router::new()
        .route("/", get(list_orders::<R>).post(create_order::<R>))
        .route("/mine", get(my_orders::<R>))
        .route("/{id}", get(get_order::<R>))
        .route("/{id}/status", put(update_status::<R>))
        .route("/{id}/archive", put(archive_order::<R>))
        .route("/{id}/payment", put(attach_payment::<R>))
        .with_state(state)
}

/// Order ids are positive integers.
fn order_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid order id: {raw}")))
}

/// Place an order
#[utoipa::path(
    post,
    path = "",
    tag = "Orders",
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn create_order<R: OrderRepository>(
    State(state): State<OrdersState<R>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateOrder>,
) -> OrderResult<(StatusCode, Json<Order>)> {
    let order = state.service.create_order(&claims, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders, newest first (admin)
#[utoipa::path(
    get,
    path = "",
    tag = "Orders",
    params(OrderFilter),
    responses(
        (status = 200, description = "Matching orders and their total", body = OrderList),
        (status = 400, response = BadRequestQueryResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn list_orders<R: OrderRepository>(
    State(state): State<OrdersState<R>>,
    AdminUser(_admin): AdminUser,
    filter: Result<Query<OrderFilter>, QueryRejection>,
) -> Result<Json<OrderList>, AppError> {
    let Query(filter) = filter.map_err(|e| AppError::InvalidQuery(e.body_text()))?;
    Ok(Json(state.service.list_orders(filter).await?))
}

/// The caller's orders, newest first
#[utoipa::path(
    get,
    path = "/mine",
    tag = "Orders",
    responses(
        (status = 200, description = "Orders placed by the caller's account", body = Vec<Order>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn my_orders<R: OrderRepository>(
    State(state): State<OrdersState<R>>,
    AuthUser(claims): AuthUser,
) -> OrderResult<Json<Vec<Order>>> {
    Ok(Json(state.service.my_orders(&claims).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Orders",
    params(
        ("id" = i64, Path, description = "Order number")
    ),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 400, description = "Malformed order id"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn get_order<R: OrderRepository>(
    State(state): State<OrdersState<R>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let order = state.service.get_order(&claims, order_id(&id)?).await?;
    Ok(Json(order))
}

/// Move an order to another status (admin)
#[utoipa::path(
    put,
    path = "/{id}/status",
    tag = "Orders",
    params(
        ("id" = i64, Path, description = "Order number")
    ),
    request_body = UpdateStatus,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn update_status<R: OrderRepository>(
    State(state): State<OrdersState<R>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatus>,
) -> Result<Json<Order>, AppError> {
    let order = state.service.update_status(order_id(&id)?, body.status).await?;
    tracing::info!(order_id = order.id, status = %order.status, admin = %admin.sub, "Order status changed");
    Ok(Json(order))
}

/// Archive an order (admin)
#[utoipa::path(
    put,
    path = "/{id}/archive",
    tag = "Orders",
    params(
        ("id" = i64, Path, description = "Order number")
    ),
    responses(
        (status = 200, description = "Archived order", body = Order),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn archive_order<R: OrderRepository>(
    State(state): State<OrdersState<R>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.service.archive(order_id(&id)?).await?))
}

/// Attach a payment reference
#[utoipa::path(
    put,
    path = "/{id}/payment",
    tag = "Orders",
    params(
        ("id" = i64, Path, description = "Order number")
    ),
    request_body = AttachPayment,
    responses(
        (status = 200, description = "Order with payment reference", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn attach_payment<R: OrderRepository>(
    State(state): State<OrdersState<R>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<AttachPayment>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .service
        .attach_payment(&claims, order_id(&id)?, body.reference)
        .await?;
    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_parsing() {
        assert_eq!(order_id("42").unwrap(), 42);
        assert!(order_id("0").is_err());
        assert!(order_id("-3").is_err());
        assert!(order_id("abc").is_err());
    }
}
