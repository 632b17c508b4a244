use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{ProductError, ProductResult};

/// Product as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// 24-character hex ObjectId
    #[schema(example = "65f1c0ffee0000000000abcd")]
    pub id: String,
    #[schema(example = "Widget")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[schema(example = 9.99)]
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored shape of a product. Field names match the JSON names so that sort keys
/// map one-to-one onto document fields.
///
/// Documents written by other clients may lack the timestamps; reads then fall back
/// to the creation time encoded in `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

impl ProductDocument {
    /// New document with a fresh id and both timestamps set to now.
    pub fn new(input: CreateProduct) -> Self {
        let now = bson::DateTime::now();
        Self {
            id: ObjectId::new(),
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            in_stock: input.in_stock,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Merge the fields present in `update` and bump `updated_at`.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(in_stock) = update.in_stock {
            self.in_stock = Some(in_stock);
        }
        self.updated_at = Some(bson::DateTime::now());
    }
}

fn to_chrono(value: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        let created_at = doc.created_at.unwrap_or_else(|| doc.id.timestamp());
        let updated_at = doc.updated_at.unwrap_or(created_at);

        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            description: doc.description,
            price: doc.price,
            category: doc.category,
            in_stock: doc.in_stock,
            created_at: to_chrono(created_at),
            updated_at: to_chrono(updated_at),
        }
    }
}

/// Request body for creating a product.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    #[schema(example = "Widget")]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Accepts a number or a numeric string such as `"12.50"`
    #[serde(deserialize_with = "price::deserialize")]
    #[validate(range(min = 0.0))]
    #[schema(example = 9.99)]
    pub price: f64,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

/// Request body for a partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "price::deserialize_option")]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

/// One page of `GET /api/products`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// Records matching the filter across all pages
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
    pub limit: u64,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Product deleted")]
    pub message: String,
}

/// Parse a path id into an [`ObjectId`].
pub fn parse_product_id(id: &str) -> ProductResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| ProductError::InvalidId(id.to_string()))
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Price fields accept JSON numbers and numeric strings; non-finite values are rejected.
mod price {
    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    fn to_price<E: de::Error>(raw: NumberOrString) -> Result<f64, E> {
        let value = match raw {
            NumberOrString::Number(n) => n,
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("price must be a number, got {s:?}")))?,
        };

        if !value.is_finite() {
            return Err(E::custom("price must be a finite number"));
        }
        Ok(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        to_price(NumberOrString::deserialize(deserializer)?)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Option::<NumberOrString>::deserialize(deserializer)?
            .map(to_price)
            .transpose()
    }
}
