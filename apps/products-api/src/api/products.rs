//! Products API routes

use axum::Router;
use domain_products::{handlers, ProductService};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    handlers::router(ProductService::new(state.product_repository()))
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    state.product_repository().init_indexes().await?;
    Ok(())
}
