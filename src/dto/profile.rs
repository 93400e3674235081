use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Product, Profile};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileOverview {
    pub email: Option<String>,
    pub profile: Option<Profile>,
    /// Every listing owned by the caller, sold ones included.
    pub listings: Vec<Product>,
}
