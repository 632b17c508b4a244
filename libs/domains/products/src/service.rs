//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, DeleteResponse, Product, ProductPage, UpdateProduct, parse_product_id,
};
use crate::query::{ListProductsQuery, ProductQuery};
use crate::repository::ProductRepository;

/// Message returned after a successful delete.
pub const DELETED_MESSAGE: &str = "Product deleted";

/// Product operations over any [`ProductRepository`].
///
/// Ids arrive as raw path strings and are parsed here, so a malformed id is
/// reported as [`ProductError::InvalidId`] before the store is touched.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        let object_id = parse_product_id(id)?;

        self.repository
            .get_by_id(object_id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Page of products plus totals. The page query and the count run concurrently.
    #[instrument(skip(self))]
    pub async fn list_products(&self, params: ListProductsQuery) -> ProductResult<ProductPage> {
        let query = ProductQuery::try_from(params)?;

        let (products, total) = tokio::try_join!(
            self.repository.list(&query),
            self.repository.count(&query)
        )?;

        Ok(ProductPage {
            total,
            page: query.page,
            total_pages: query.total_pages(total),
            limit: query.limit,
            products,
        })
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        let object_id = parse_product_id(id)?;
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository
            .update(object_id, input)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> ProductResult<DeleteResponse> {
        let object_id = parse_product_id(id)?;

        if !self.repository.delete(object_id).await? {
            return Err(ProductError::NotFound(id.to_string()));
        }

        Ok(DeleteResponse {
            message: DELETED_MESSAGE.to_string(),
        })
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductDocument;
    use crate::query::{SortField, SortOrder};
    use crate::repository::MockProductRepository;
    use mockall::predicate::eq;
    use mongodb::bson::oid::ObjectId;

    fn widget() -> CreateProduct {
        CreateProduct {
            name: "Widget".to_string(),
            description: None,
            price: 9.99,
            category: None,
            in_stock: None,
        }
    }

    fn stored(input: CreateProduct) -> Product {
        ProductDocument::new(input).into()
    }

    #[tokio::test]
    async fn test_create_product_returns_stored_record() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .withf(|input| input.name == "Widget" && input.price == 9.99)
            .times(1)
            .returning(|input| Ok(stored(input)));

        let product = ProductService::new(repo).create_product(widget()).await.unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 9.99);
    }

    #[tokio::test]
    async fn test_create_product_rejects_negative_price_without_touching_store() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let input = CreateProduct {
            price: -1.0,
            ..widget()
        };
        let err = ProductService::new(repo).create_product(input).await.unwrap_err();

        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let id = ObjectId::new();
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let err = ProductService::new(repo)
            .get_product(&id.to_hex())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound(ref s) if *s == id.to_hex()));
    }

    #[tokio::test]
    async fn test_malformed_id_never_reaches_store() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().never();
        repo.expect_update().never();
        repo.expect_delete().never();
        let service = ProductService::new(repo);

        for id in ["", "123", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
            assert!(matches!(service.get_product(id).await, Err(ProductError::InvalidId(_))));
            assert!(matches!(
                service.update_product(id, UpdateProduct::default()).await,
                Err(ProductError::InvalidId(_))
            ));
            assert!(matches!(service.delete_product(id).await, Err(ProductError::InvalidId(_))));
        }
    }

    #[tokio::test]
    async fn test_list_products_builds_page() {
        let mut repo = MockProductRepository::new();
        repo.expect_list()
            .withf(|q| {
                q.page == 2
                    && q.limit == 5
                    && q.sort.field == SortField::Price
                    && q.sort.order == SortOrder::Desc
            })
            .returning(|_| Ok(vec![stored(widget())]));
        repo.expect_count().returning(|_| Ok(6));

        let page = ProductService::new(repo)
            .list_products(ListProductsQuery {
                sort_by: Some("price".into()),
                order: Some("desc".into()),
                page: Some(2),
                limit: Some(5),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 6);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 5);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.products.len(), 1);
    }

    #[tokio::test]
    async fn test_list_products_rejects_unknown_sort_field() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().never();
        repo.expect_count().never();

        let err = ProductService::new(repo)
            .list_products(ListProductsQuery {
                sort_by: Some("colour".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_products_propagates_store_failure() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|_| Ok(vec![]));
        repo.expect_count()
            .returning(|_| Err(ProductError::Database("connection reset".into())));

        let err = ProductService::new(repo)
            .list_products(ListProductsQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Database(_)));
    }

    #[tokio::test]
    async fn test_update_product_missing_record() {
        let id = ObjectId::new();
        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .withf(move |got, input| *got == id && input.in_stock == Some(false))
            .returning(|_, _| Ok(None));

        let update = UpdateProduct {
            in_stock: Some(false),
            ..Default::default()
        };
        let err = ProductService::new(repo)
            .update_product(&id.to_hex(), update)
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_product_rejects_blank_name() {
        let mut repo = MockProductRepository::new();
        repo.expect_update().never();

        let update = UpdateProduct {
            name: Some("  ".into()),
            ..Default::default()
        };
        let err = ProductService::new(repo)
            .update_product(&ObjectId::new().to_hex(), update)
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let id = ObjectId::new();
        let mut repo = MockProductRepository::new();
        repo.expect_delete().with(eq(id)).times(1).returning(|_| Ok(true));

        let response = ProductService::new(repo)
            .delete_product(&id.to_hex())
            .await
            .unwrap();
        assert_eq!(response.message, DELETED_MESSAGE);
    }

    #[tokio::test]
    async fn test_delete_product_missing_record() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let err = ProductService::new(repo)
            .delete_product(&ObjectId::new().to_hex())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::NotFound(_)));
    }
}
