use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Product, ProductStatus},
    state::AppState,
};

pub(crate) const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.title, p.description, p.price, p.condition,
           p.category_id, c.name AS category_name, p.image_url, p.status, p.created_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Product joined with its category name, as read from Postgres.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub condition: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let condition = row
            .condition
            .parse()
            .map_err(|e: String| AppError::Internal(anyhow::anyhow!("product {}: {e}", row.id)))?;
        let status = row
            .status
            .parse()
            .map_err(|e: String| AppError::Internal(anyhow::anyhow!("product {}: {e}", row.id)))?;
        Ok(Product {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            price: row.price,
            condition,
            category_id: row.category_id,
            category: row.category_name,
            image_url: row.image_url,
            status,
            created_at: row.created_at,
        })
    }
}

pub(crate) fn products_from_rows(rows: Vec<ProductRow>) -> AppResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Load one product straight from the database.
pub async fn fetch_product(state: &AppState, id: Uuid) -> AppResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    row.map(Product::try_from).transpose()
}

/// Read-through lookup used by the detail page.
pub async fn cached_product(state: &AppState, id: Uuid) -> AppResult<Option<Product>> {
    state
        .products
        .get_or_try_load(id, || fetch_product(state, id))
        .await
}

pub async fn fetch_available(state: &AppState, limit: Option<u64>) -> AppResult<Vec<Product>> {
    let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "{PRODUCT_SELECT} WHERE p.status = $1 ORDER BY p.created_at DESC LIMIT $2"
    ))
    .bind(ProductStatus::Available.as_str())
    .bind(limit)
    .fetch_all(&state.pool)
    .await?;
    products_from_rows(rows)
}

pub async fn fetch_owned(state: &AppState, user_id: Uuid) -> AppResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "{PRODUCT_SELECT} WHERE p.user_id = $1 ORDER BY p.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(&state.pool)
    .await?;
    products_from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;

    fn row(condition: &str, status: &str) -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Desk lamp".into(),
            description: None,
            price: Decimal::new(4500, 2),
            condition: condition.into(),
            category_id: None,
            category_name: Some("Home Decor".into()),
            image_url: None,
            status: status.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_converts_to_typed_product() {
        let product = Product::try_from(row("like-new", "sold")).unwrap();
        assert_eq!(product.condition, Condition::LikeNew);
        assert_eq!(product.status, ProductStatus::Sold);
        assert_eq!(product.category.as_deref(), Some("Home Decor"));
    }

    #[test]
    fn unknown_enum_text_is_rejected_at_the_boundary() {
        assert!(Product::try_from(row("broken", "available")).is_err());
        assert!(Product::try_from(row("good", "reserved")).is_err());
    }
}
