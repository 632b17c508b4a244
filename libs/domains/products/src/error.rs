use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Invalid product id '{0}'")]
    InvalidId(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Product {0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::InvalidId(_) => AppError::InvalidId(err.to_string()),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ProductError::InvalidId("abc".into()), StatusCode::BAD_REQUEST),
            (ProductError::Validation("bad sortBy".into()), StatusCode::BAD_REQUEST),
            (ProductError::NotFound("65f1c0ffee0000000000abcd".into()), StatusCode::NOT_FOUND),
            (ProductError::Database("timeout".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ProductError::NotFound("65f1c0ffee0000000000abcd".into()).to_string(),
            "Product 65f1c0ffee0000000000abcd not found"
        );
        assert_eq!(
            ProductError::InvalidId("abc".into()).to_string(),
            "Invalid product id 'abc'"
        );
    }
}
