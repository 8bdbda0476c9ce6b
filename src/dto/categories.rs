use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{validate_not_blank, validate_slug};

use crate::models::CategoryWithProducts;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCategoryRequest {
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub category_name: String,
    /// Derived from the name when omitted
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub category_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<CategoryWithProducts>)]
    pub items: Vec<CategoryWithProducts>,
}
