//! Query-string extractor with validation and JSON error bodies.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Like [`Query`], but rejects with the standard 400 error body and runs `Validate`.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state).await?;
        params.validate()?;
        Ok(ValidatedQuery(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Paging {
        page: Option<i64>,
        #[validate(length(max = 5))]
        search: Option<String>,
    }

    async fn handler(ValidatedQuery(q): ValidatedQuery<Paging>) -> String {
        format!("{:?}", q.page)
    }

    async fn status_for(uri: &str) -> StatusCode {
        Router::new()
            .route("/", get(handler))
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_query_extraction() {
        assert_eq!(status_for("/?page=2").await, StatusCode::OK);
        assert_eq!(status_for("/").await, StatusCode::OK);
        assert_eq!(status_for("/?page=two").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_for("/?search=toolong").await, StatusCode::BAD_REQUEST);
    }
}
