use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::query::CatalogQuery;

/// Data access for the product catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// One page of products matching `query`, ordered by id.
    async fn find_page(&self, query: &CatalogQuery) -> ProductResult<Vec<Product>>;

    /// Number of products matching `query`, ignoring its page.
    async fn count(&self, query: &CatalogQuery) -> ProductResult<u64>;

    /// Every distinct business line, sorted.
    async fn distinct_business_lines(&self) -> ProductResult<Vec<String>>;

    /// Merge `input` into the stored product. `None` when it does not exist.
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>>;

    /// Remove and return the product. `None` when it does not exist.
    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>>;
}

/// Process-local repository used by tests and local development.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already-built product, keeping its id.
    pub async fn insert(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    fn sorted_matches(products: &HashMap<Uuid, Product>, query: &CatalogQuery) -> Vec<Product> {
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        matching.sort_by_key(|p| p.id);
        matching
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        self.insert(product.clone()).await;
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn find_page(&self, query: &CatalogQuery) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(Self::sorted_matches(&products, query)
            .into_iter()
            .skip(query.page.skip() as usize)
            .take(query.page.limit() as usize)
            .collect())
    }

    async fn count(&self, query: &CatalogQuery) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products.values().filter(|p| query.matches(p)).count() as u64)
    }

    async fn distinct_business_lines(&self) -> ProductResult<Vec<String>> {
        let products = self.products.read().await;
        let lines: BTreeSet<String> = products
            .values()
            .map(|p| p.business_line.clone())
            .collect();
        Ok(lines.into_iter().collect())
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products.get_mut(&id).map(|product| {
            product.apply_update(input);
            product.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.products.write().await.remove(&id))
    }
}
