use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Item-quality label attached to every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    New,
    #[serde(alias = "used-like-new")]
    LikeNew,
    #[serde(alias = "used-good")]
    Good,
    #[serde(alias = "used-fair")]
    Fair,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like-new",
            Condition::Good => "good",
            Condition::Fair => "fair",
        }
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(Condition::New),
            "like-new" | "used-like-new" => Ok(Condition::LikeNew),
            "good" | "used-good" => Ok(Condition::Good),
            "fair" | "used-fair" => Ok(Condition::Fair),
            other => Err(format!("Unknown condition `{other}`")),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Available,
    Sold,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Available => "available",
            ProductStatus::Sold => "sold",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(ProductStatus::Available),
            "sold" => Ok(ProductStatus::Sold),
            other => Err(format!("Unknown status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub condition: Condition,
    pub category_id: Option<Uuid>,
    /// Denormalized category name, when the category still exists.
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

/// The slice of a product rendered on catalog cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductCard {
    pub id: Uuid,
    pub title: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub condition: Condition,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            condition: product.condition,
            image_url: product.image_url.clone(),
            category: product.category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_accepts_legacy_spellings() {
        assert_eq!("used-like-new".parse::<Condition>(), Ok(Condition::LikeNew));
        assert_eq!("used-good".parse::<Condition>(), Ok(Condition::Good));
        assert_eq!("fair".parse::<Condition>(), Ok(Condition::Fair));
        assert!("mint".parse::<Condition>().is_err());
    }

    #[test]
    fn condition_serializes_kebab_case() {
        let json = serde_json::to_string(&Condition::LikeNew).unwrap();
        assert_eq!(json, "\"like-new\"");
        let parsed: Condition = serde_json::from_str("\"used-fair\"").unwrap();
        assert_eq!(parsed, Condition::Fair);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [ProductStatus::Available, ProductStatus::Sold] {
            assert_eq!(status.as_str().parse::<ProductStatus>(), Ok(status));
        }
    }
}
