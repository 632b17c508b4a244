use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::query::ProductQuery;

/// Data access for products.
///
/// Lookups return `Ok(None)` / `Ok(false)` for missing records; turning that into
/// a not-found error is the service's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product, assigning its id and timestamps
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// One page of products matching `query`, in its sort order
    async fn list(&self, query: &ProductQuery) -> ProductResult<Vec<Product>>;

    /// Number of products matching `query`'s filter, ignoring paging
    async fn count(&self, query: &ProductQuery) -> ProductResult<u64>;

    /// Apply a partial update; `None` when no product has this id
    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Option<Product>>;

    /// `true` when a product was removed
    async fn delete(&self, id: ObjectId) -> ProductResult<bool>;
}
