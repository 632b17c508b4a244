//! Translation of list query parameters into a typed query and its MongoDB rendering.

use mongodb::bson::{Document, doc};
use serde::Deserialize;
use strum::{AsRefStr, EnumString};
use utoipa::IntoParams;
use validator::Validate;

use crate::error::{ProductError, ProductResult};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Raw query string of `GET /api/products`.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// Case-insensitive substring of the product name
    #[validate(length(max = 200))]
    pub search: Option<String>,
    /// One of `name`, `price`, `category`, `inStock`, `createdAt`, `updatedAt` (default `createdAt`)
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`
    pub order: Option<String>,
    /// 1-based page number, values below 1 are treated as 1 and huge values are capped
    pub page: Option<i64>,
    /// Page size, clamped to 1..=100 (default 10)
    pub limit: Option<i64>,
}

/// Sortable product fields, named as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
    Name,
    Price,
    Category,
    InStock,
    #[default]
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// MongoDB sort direction.
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

/// Validated list query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub sort: SortSpec,
    pub page: u64,
    pub limit: u64,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort: SortSpec::default(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Trimmed value, or `None` when absent or blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Highest page whose skip still fits the store's signed 64-bit skip.
fn max_page(limit: u64) -> u64 {
    i64::MAX as u64 / limit
}

impl TryFrom<ListProductsQuery> for ProductQuery {
    type Error = ProductError;

    fn try_from(params: ListProductsQuery) -> ProductResult<Self> {
        let field = match non_blank(params.sort_by) {
            None => SortField::default(),
            Some(raw) => raw.parse().map_err(|_| {
                ProductError::Validation(format!(
                    "Unsupported sortBy '{raw}'; expected one of name, price, category, inStock, createdAt, updatedAt"
                ))
            })?,
        };

        let order = match non_blank(params.order) {
            None => SortOrder::default(),
            Some(raw) => raw.parse().map_err(|_| {
                ProductError::Validation(format!("Unsupported order '{raw}'; expected asc or desc"))
            })?,
        };

        let limit = params
            .limit
            .map_or(DEFAULT_LIMIT, |l| l.clamp(1, MAX_LIMIT as i64) as u64);
        let page = params
            .page
            .map_or(DEFAULT_PAGE, |p| (p.max(1) as u64).min(max_page(limit)));

        Ok(Self {
            search: non_blank(params.search),
            sort: SortSpec { field, order },
            page,
            limit,
        })
    }
}

impl ProductQuery {
    /// Records skipped before this page.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`, zero when there are no records.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }

    /// Name filter; the search term is escaped so it matches literally.
    pub fn filter_document(&self) -> Document {
        match &self.search {
            Some(term) => doc! {
                "name": { "$regex": regex::escape(term), "$options": "i" }
            },
            None => doc! {},
        }
    }

    /// Sort on the requested field with `_id` as a tiebreak in the same direction.
    pub fn sort_document(&self) -> Document {
        let direction = self.sort.order.direction();
        let mut sort = Document::new();
        sort.insert(self.sort.field.as_ref(), direction);
        sort.insert("_id", direction);
        sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListProductsQuery {
        ListProductsQuery::default()
    }

    #[test]
    fn test_defaults() {
        let query = ProductQuery::try_from(params()).unwrap();
        assert_eq!(query, ProductQuery::default());
        assert_eq!(query.skip(), 0);
        assert_eq!(query.filter_document(), doc! {});
        assert_eq!(query.sort_document(), doc! { "createdAt": 1, "_id": 1 });
    }

    #[test]
    fn test_page_and_limit_are_clamped() {
        let query = ProductQuery::try_from(ListProductsQuery {
            page: Some(0),
            limit: Some(1000),
            ..params()
        })
        .unwrap();
        assert_eq!((query.page, query.limit), (1, MAX_LIMIT));

        let query = ProductQuery::try_from(ListProductsQuery {
            page: Some(3),
            limit: Some(-4),
            ..params()
        })
        .unwrap();
        assert_eq!((query.page, query.limit), (3, 1));
        assert_eq!(query.skip(), 2);
    }

    #[test]
    fn test_huge_page_is_capped_to_a_representable_skip() {
        for limit in [1, 10, MAX_LIMIT as i64] {
            let query = ProductQuery::try_from(ListProductsQuery {
                page: Some(i64::MAX),
                limit: Some(limit),
                ..params()
            })
            .unwrap();

            assert!(query.skip() <= i64::MAX as u64, "limit {limit}");
            assert!(query.page > 1);
        }

        let query = ProductQuery::try_from(ListProductsQuery {
            page: Some(i64::MAX),
            limit: Some(100),
            ..params()
        })
        .unwrap();
        assert_eq!(query.page, i64::MAX as u64 / 100);
    }

    #[test]
    fn test_skip() {
        let query = ProductQuery {
            page: 4,
            limit: 25,
            ..Default::default()
        };
        assert_eq!(query.skip(), 75);
    }

    #[test]
    fn test_total_pages() {
        let query = ProductQuery {
            limit: 10,
            ..Default::default()
        };
        assert_eq!(query.total_pages(0), 0);
        assert_eq!(query.total_pages(1), 1);
        assert_eq!(query.total_pages(10), 1);
        assert_eq!(query.total_pages(11), 2);
    }

    #[test]
    fn test_sort_field_and_order_parsing() {
        let query = ProductQuery::try_from(ListProductsQuery {
            sort_by: Some("inStock".into()),
            order: Some("DESC".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.sort_document(), doc! { "inStock": -1, "_id": -1 });
    }

    #[test]
    fn test_unknown_sort_field_is_rejected() {
        for bad in ["colour", "Price", "_id", "password"] {
            let err = ProductQuery::try_from(ListProductsQuery {
                sort_by: Some(bad.into()),
                ..params()
            })
            .unwrap_err();
            assert!(matches!(err, ProductError::Validation(_)), "{bad}");
        }
    }

    #[test]
    fn test_unknown_order_is_rejected() {
        let err = ProductQuery::try_from(ListProductsQuery {
            order: Some("sideways".into()),
            ..params()
        })
        .unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[test]
    fn test_search_is_trimmed_and_escaped() {
        let query = ProductQuery::try_from(ListProductsQuery {
            search: Some("  a.b(c)  ".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(
            query.filter_document(),
            doc! { "name": { "$regex": r"a\.b\(c\)", "$options": "i" } }
        );

        let blank = ProductQuery::try_from(ListProductsQuery {
            search: Some("   ".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(blank.search, None);
        assert_eq!(blank.filter_document(), doc! {});
    }
}
