//! Products Domain
//!
//! The chemical catalog: paginated listing by business line and price range,
//! free-text search, the distinct business-line list and admin CRUD.
//!
//! ```text
//! handlers ─▶ service ─▶ repository (trait) ─▶ MongoDB | in-memory
//!                 │
//!                 └─▶ query (CatalogQuery: filter + page)
//! ```
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_products::{MongoProductRepository, ProductService, handlers};
//!
//! # async fn example(db: mongodb::Database) -> Result<(), Box<dyn std::error::Error>> {
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let auth = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-thirty-two-bytes", 3600)?);
//! let router = handlers::router(ProductService::new(repository), auth);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    BusinessLines, ChemicalAttributes, CreateProduct, MarketingCopy, MutationResponse,
    PageParams, Product, ProductPage, UpdateProduct,
};
pub use crate::mongodb::MongoProductRepository;
pub use query::{CatalogFilter, CatalogQuery, CatalogQueryError, PAGE_SIZE, Page, PriceRange};
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
