//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductPage, UpdateProduct};
use crate::query::{CatalogQuery, page_count};
use crate::repository::ProductRepository;

pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Run a catalog query, returning one page and the total page count.
    ///
    /// Fetch and count are issued concurrently and are not a snapshot.
    #[instrument(skip(self))]
    pub async fn query_catalog(&self, query: CatalogQuery) -> ProductResult<ProductPage> {
        let (products, total) = tokio::try_join!(
            self.repository.find_page(&query),
            self.repository.count(&query)
        )?;

        tracing::debug!(page = query.page.index(), returned = products.len(), total, "Catalog query");
        Ok(ProductPage {
            products,
            pages: page_count(total),
        })
    }

    /// Listing filtered by optional business line and `"<low>-<high>"` price.
    pub async fn list_products(
        &self,
        business_line: Option<&str>,
        price: Option<&str>,
        from: Option<&str>,
    ) -> ProductResult<ProductPage> {
        let query = CatalogQuery::listing(business_line, price, from)?;
        self.query_catalog(query).await
    }

    pub async fn search_products(&self, term: &str, from: Option<&str>) -> ProductResult<ProductPage> {
        let query = CatalogQuery::search(term, from)?;
        self.query_catalog(query).await
    }

    #[instrument(skip(self))]
    pub async fn business_lines(&self) -> ProductResult<Vec<String>> {
        self.repository.distinct_business_lines().await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;
        self.repository.create(input).await
    }

    /// Apply a partial update and return the updated product.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input.validate()?;
        self.repository
            .update(id, input)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Delete a product, returning what was removed.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .delete(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
