//! Orders Domain
//!
//! Orders carry a snapshot of the buyer's contact details and the purchased
//! line items. Ids come from a per-collection counter so they read as order
//! numbers. Buyers see their own orders; admins manage status and archiving.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use handlers::ApiDoc;
pub use models::{
    AttachPayment, CreateOrder, CustomerSnapshot, LineItem, Order, OrderFilter, OrderList,
    OrderStatus, MAX_LIST_LIMIT, TOTAL_TOLERANCE, UpdateStatus,
};
pub use crate::mongodb::MongoOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
