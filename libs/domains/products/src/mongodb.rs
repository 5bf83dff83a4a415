//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, doc},
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::query::CatalogQuery;
use crate::repository::ProductRepository;

pub const PRODUCTS_COLLECTION: &str = "products";

pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Product>(collection_name),
        }
    }

    /// Indexes backing the listing filters and the search fields.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = |keys, name: &str| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        };

        let indexes = vec![
            index(doc! { "businessLine": 1, "price": 1 }, "idx_business_line_price"),
            index(doc! { "price": 1 }, "idx_price"),
            index(doc! { "name": 1 }, "idx_name"),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> mongodb::bson::Document {
        doc! { "_id": id.to_string() }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.collection.find_one(Self::id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn find_page(&self, query: &CatalogQuery) -> ProductResult<Vec<Product>> {
        let cursor = self
            .collection
            .find(query.filter_document())
            .sort(doc! { "_id": 1 })
            .skip(query.page.skip())
            .limit(query.page.limit())
            .await?;

        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn count(&self, query: &CatalogQuery) -> ProductResult<u64> {
        Ok(self
            .collection
            .count_documents(query.filter_document())
            .await?)
    }

    #[instrument(skip(self))]
    async fn distinct_business_lines(&self) -> ProductResult<Vec<String>> {
        let values = self.collection.distinct("businessLine", doc! {}).await?;

        let mut lines: Vec<String> = values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(line) => Some(line),
                _ => None,
            })
            .collect();
        lines.sort();
        Ok(lines)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let filter = Self::id_filter(id);
        let Some(mut product) = self.collection.find_one(filter.clone()).await? else {
            return Ok(None);
        };

        product.apply_update(input);
        self.collection.replace_one(filter, &product).await?;

        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(Some(product))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let deleted = self
            .collection
            .find_one_and_delete(Self::id_filter(id))
            .await?;

        if deleted.is_some() {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(deleted)
    }
}
