use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategoryFilterOption {
    pub name: &'static str,
    pub slug: &'static str,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}
