//! Catalogue rows and their ratings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// A product row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Row identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Unit price; non-negative, enforced at the validation boundary.
    pub price: f64,
    /// Optional image location.
    pub image_url: Option<String>,
    /// Optional category tag used for filtering.
    pub category: Option<String>,
    /// Units in stock.
    pub stock: i64,
    /// Optional calorie count.
    pub calories: Option<i64>,
    /// Optional spiciness label.
    pub spicy_level: Option<String>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// One customer rating of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Rating {
    /// Row identifier.
    pub id: Uuid,
    /// Star value, conventionally 1 to 5.
    pub rating: i64,
    /// Optional free-text review.
    pub review: Option<String>,
    /// Author.
    pub user_id: Uuid,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// Ratings block attached to a product detail response.
///
/// Built even when the ratings fetch fails: the product view degrades
/// to an empty block rather than failing the whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatingsSummary {
    /// Mean rating to one decimal place, absent when there are no
    /// reviews.
    pub average: Option<String>,
    /// Number of reviews.
    pub count: usize,
    /// The reviews themselves, newest first.
    pub reviews: Vec<Rating>,
}

impl RatingsSummary {
    /// Summarise a list of ratings (newest first, as fetched).
    #[must_use]
    pub fn from_ratings(reviews: Vec<Rating>) -> Self {
        let count = reviews.len();
        let average = if count == 0 {
            None
        } else {
            let sum: i64 = reviews.iter().map(|r| r.rating).sum();
            #[expect(clippy::cast_precision_loss, reason = "star counts are tiny")]
            Some(format!("{:.1}", sum as f64 / count as f64))
        };
        Self {
            average,
            count,
            reviews,
        }
    }
}

/// Nested product columns embedded in an order item response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    /// Row identifier.
    pub id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Optional long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional image location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Optional category tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Current unit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Columns the products list endpoint can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSortField {
    /// Unit price.
    Price,
    /// Display name.
    Name,
    /// Row creation time; the default.
    CreatedAt,
    /// Units in stock.
    Stock,
}

impl ProductSortField {
    /// Store column backing this sort field.
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Name => "name",
            Self::CreatedAt => "created_at",
            Self::Stock => "stock",
        }
    }
}

impl Default for ProductSortField {
    fn default() -> Self {
        Self::CreatedAt
    }
}

/// Error for an unrecognised product sort field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid sort field. Must be one of: price, name, created_at, stock")]
pub struct ProductSortFieldParseError;

impl std::str::FromStr for ProductSortField {
    type Err = ProductSortFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(Self::Price),
            "name" => Ok(Self::Name),
            "created_at" => Ok(Self::CreatedAt),
            "stock" => Ok(Self::Stock),
            _ => Err(ProductSortFieldParseError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rating(stars: i64) -> Rating {
        Rating {
            id: Uuid::new_v4(),
            rating: stars,
            review: None,
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ratings_average_is_one_decimal() {
        let summary = RatingsSummary::from_ratings(vec![rating(5), rating(4), rating(4)]);
        assert_eq!(summary.average.as_deref(), Some("4.3"));
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn empty_ratings_have_no_average() {
        let summary = RatingsSummary::from_ratings(Vec::new());
        assert_eq!(summary.average, None);
        assert_eq!(summary.count, 0);
        assert!(summary.reviews.is_empty());
    }

    #[test]
    fn sort_field_parse_lists_valid_fields_on_error() {
        let err = "weight"
            .parse::<ProductSortField>()
            .expect_err("unknown field rejected");
        assert!(err.to_string().contains("price, name, created_at, stock"));
        assert_eq!(
            "stock".parse::<ProductSortField>().expect("known field"),
            ProductSortField::Stock
        );
    }
}
