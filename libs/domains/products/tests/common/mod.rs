//! In-memory repositories for driving the real router without MongoDB.

#![allow(dead_code)]

use async_trait::async_trait;
use domain_products::{
    CreateProduct, Product, ProductDocument, ProductError, ProductQuery, ProductRepository,
    ProductResult, SortField, SortOrder, UpdateProduct,
};
use mongodb::bson::oid::ObjectId;
use std::cmp::Ordering;
use std::sync::Mutex;

/// Mirrors the MongoDB repository's query semantics: case-insensitive name
/// substring filter, missing values sorting first, `_id` tiebreak, skip/limit.
#[derive(Default)]
pub struct InMemoryProductRepository {
    documents: Mutex<Vec<ProductDocument>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matching(&self, query: &ProductQuery) -> Vec<ProductDocument> {
        let documents = self.documents.lock().unwrap();
        match &query.search {
            Some(term) => {
                let needle = term.to_lowercase();
                documents
                    .iter()
                    .filter(|doc| doc.name.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            }
            None => documents.clone(),
        }
    }
}

fn compare(a: &ProductDocument, b: &ProductDocument, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Price => a.price.total_cmp(&b.price),
        SortField::Category => a.category.cmp(&b.category),
        SortField::InStock => a.in_stock.cmp(&b.in_stock),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let document = ProductDocument::new(input);
        self.documents.lock().unwrap().push(document.clone());
        Ok(document.into())
    }

    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        let documents = self.documents.lock().unwrap();
        Ok(documents
            .iter()
            .find(|doc| doc.id == id)
            .cloned()
            .map(Product::from))
    }

    async fn list(&self, query: &ProductQuery) -> ProductResult<Vec<Product>> {
        let mut documents = self.matching(query);
        documents.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort.field).then_with(|| a.id.cmp(&b.id));
            match query.sort.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(documents
            .into_iter()
            .skip(query.skip() as usize)
            .take(query.limit as usize)
            .map(Product::from)
            .collect())
    }

    async fn count(&self, query: &ProductQuery) -> ProductResult<u64> {
        Ok(self.matching(query).len() as u64)
    }

    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let mut documents = self.documents.lock().unwrap();
        Ok(documents.iter_mut().find(|doc| doc.id == id).map(|doc| {
            doc.apply_update(input);
            Product::from(doc.clone())
        }))
    }

    async fn delete(&self, id: ObjectId) -> ProductResult<bool> {
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|doc| doc.id != id);
        Ok(documents.len() < before)
    }
}

/// Every operation fails the way an unreachable store would.
pub struct UnavailableRepository;

fn unavailable<T>() -> ProductResult<T> {
    Err(ProductError::Database(
        "Server selection timeout: No available servers".to_string(),
    ))
}

#[async_trait]
impl ProductRepository for UnavailableRepository {
    async fn create(&self, _input: CreateProduct) -> ProductResult<Product> {
        unavailable()
    }

    async fn get_by_id(&self, _id: ObjectId) -> ProductResult<Option<Product>> {
        unavailable()
    }

    async fn list(&self, _query: &ProductQuery) -> ProductResult<Vec<Product>> {
        unavailable()
    }

    async fn count(&self, _query: &ProductQuery) -> ProductResult<u64> {
        unavailable()
    }

    async fn update(&self, _id: ObjectId, _input: UpdateProduct) -> ProductResult<Option<Product>> {
        unavailable()
    }

    async fn delete(&self, _id: ObjectId) -> ProductResult<bool> {
        unavailable()
    }
}
