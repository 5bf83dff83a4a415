use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Largest accepted gap between the submitted and the computed total.
pub const TOTAL_TOLERANCE: f64 = 0.005;

/// Order lifecycle status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
    Rejected,
}

/// Contact details of the buyer, copied into the order when it is placed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    #[validate(length(min = 5, max = 50, message = "must be between 5 and 50 characters"))]
    pub name: String,
    #[validate(length(min = 5, max = 50, message = "must be between 5 and 50 characters"))]
    pub last_name: String,
    #[validate(
        email(message = "must be a valid email"),
        length(min = 8, max = 255, message = "must be between 8 and 255 characters")
    )]
    pub email: String,
    #[validate(length(min = 7, message = "must be at least 7 characters"))]
    pub telephone: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub identification_type: String,
    #[validate(range(min = 1, message = "must be a positive number"))]
    pub identification_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(with = "database::mongodb::uuid_string")]
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub qty: i64,
    /// Unit price
    #[validate(range(min = 0.0, message = "must be zero or more"))]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl LineItem {
    pub fn subtotal(&self) -> f64 {
        self.qty as f64 * self.price
    }
}

/// Order stored in the `orders` collection, keyed by a numeric sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: i64,
    /// Subject of the account that placed the order
    pub customer_id: String,
    pub user: CustomerSnapshot,
    pub products: Vec<LineItem>,
    #[serde(default)]
    pub archived: bool,
    pub total_price: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[validate(nested)]
    pub user: CustomerSnapshot,
    #[validate(length(min = 1, message = "must contain at least one item"), nested)]
    pub products: Vec<LineItem>,
    #[validate(range(min = 0.0, message = "must be zero or more"))]
    pub total_price: f64,
}

impl CreateOrder {
    /// Σ qty × price over the line items.
    pub fn computed_total(&self) -> f64 {
        self.products.iter().map(LineItem::subtotal).sum()
    }

    pub fn total_matches(&self) -> bool {
        (self.computed_total() - self.total_price).abs() <= TOTAL_TOLERANCE
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatus {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AttachPayment {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub reference: String,
}

/// Query filters for the admin order list
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub archived: Option<bool>,
    /// Buyer email, exact match
    pub email: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> i64 {
    50
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            status: None,
            archived: None,
            email: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// Largest page an admin listing returns.
pub const MAX_LIST_LIMIT: i64 = 200;

impl OrderFilter {
    /// Clamp `limit` into `1..=MAX_LIST_LIMIT`.
    pub fn normalized(mut self) -> Self {
        self.limit = self.limit.clamp(1, MAX_LIST_LIMIT);
        self
    }

    /// In-memory counterpart of the MongoDB filter.
    pub fn matches(&self, order: &Order) -> bool {
        self.status.is_none_or(|status| order.status == status)
            && self.archived.is_none_or(|archived| order.archived == archived)
            && self
                .email
                .as_deref()
                .is_none_or(|email| order.user.email.eq_ignore_ascii_case(email))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderList {
    pub orders: Vec<Order>,
    pub total: u64,
}

impl Order {
    pub fn new(id: i64, customer_id: impl Into<String>, input: CreateOrder) -> Self {
        let now = Utc::now();
        let mut user = input.user;
        user.email = user.email.trim().to_lowercase();

        Self {
            id,
            customer_id: customer_id.into(),
            user,
            products: input.products,
            archived: false,
            total_price: input.total_price,
            status: OrderStatus::Pending,
            payment_reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, customer_id: &str) -> bool {
        self.customer_id == customer_id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
