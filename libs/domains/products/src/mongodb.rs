//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc, oid::ObjectId},
    options::{FindOptions, IndexOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductDocument, UpdateProduct};
use crate::query::ProductQuery;
use crate::repository::ProductRepository;

/// Default collection name.
pub const DEFAULT_COLLECTION: &str = "products";

pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<ProductDocument>(collection_name),
        }
    }

    /// Create the indexes backing search and the common sort orders. Idempotent.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = |keys: Document, name: &str| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        };

        let indexes = vec![
            index(doc! { "name": 1 }, "idx_name"),
            index(doc! { "createdAt": -1 }, "idx_created_at"),
            index(doc! { "price": 1 }, "idx_price"),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = %self.collection.name(), "Product indexes created");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<ProductDocument> {
        &self.collection
    }
}

/// `$set` document for a partial update: only the present fields plus `updatedAt`.
fn update_document(input: &UpdateProduct, now: bson::DateTime) -> Document {
    let mut set = doc! { "updatedAt": now };

    if let Some(name) = &input.name {
        set.insert("name", name.as_str());
    }
    if let Some(description) = &input.description {
        set.insert("description", description.as_str());
    }
    if let Some(price) = input.price {
        set.insert("price", price);
    }
    if let Some(category) = &input.category {
        set.insert("category", category.as_str());
    }
    if let Some(in_stock) = input.in_stock {
        set.insert("inStock", in_stock);
    }

    doc! { "$set": set }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let document = ProductDocument::new(input);
        self.collection.insert_one(&document).await?;

        tracing::info!(product_id = %document.id, "Product created");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        let document = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(document.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &ProductQuery) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder()
            .sort(query.sort_document())
            .skip(query.skip())
            .limit(query.limit as i64)
            .build();

        let cursor = self
            .collection
            .find(query.filter_document())
            .with_options(options)
            .await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, query: &ProductQuery) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(query.filter_document())
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, update_document(&input, bson::DateTime::now()))
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(product_id = %id, "Product updated");
        }
        Ok(updated.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ProductResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        let deleted = result.deleted_count > 0;
        if deleted {
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_document_with_no_fields_only_bumps_timestamp() {
        let now = bson::DateTime::from_millis(1_700_000_000_000);
        let update = update_document(&UpdateProduct::default(), now);

        assert_eq!(update, doc! { "$set": { "updatedAt": now } });
    }

    #[test]
    fn test_update_document_uses_stored_field_names() {
        let now = bson::DateTime::now();
        let input = UpdateProduct {
            price: Some(12.5),
            in_stock: Some(false),
            ..Default::default()
        };

        let update = update_document(&input, now);
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_f64("price").unwrap(), 12.5);
        assert!(!set.get_bool("inStock").unwrap());
        assert!(!set.contains_key("name"));
        assert!(!set.contains_key("description"));
    }
}
