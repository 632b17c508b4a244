//! Products Domain
//!
//! CRUD over a MongoDB-backed product catalog.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, request validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← id parsing, not-found mapping, paging
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + MongoDB implementation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │Models/Query │  ← documents, DTOs, list query builder
//! └─────────────┘
//! ```
//!
//! ```rust,no_run
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("products");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let router = handlers::router(ProductService::new(repository));
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
    CreateProduct, DeleteResponse, Product, ProductDocument, ProductPage, UpdateProduct,
};
pub use self::mongodb::MongoProductRepository;
pub use query::{ListProductsQuery, ProductQuery, SortField, SortOrder, SortSpec};
pub use repository::ProductRepository;
pub use service::ProductService;
