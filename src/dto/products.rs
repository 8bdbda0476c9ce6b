use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{validate_not_blank, validate_slug};

use crate::models::ProductListItem;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 characters"))]
    pub product_name: String,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price: i64,
    pub description: Option<String>,
    /// Derived from the name when omitted
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    /// Percent off, 0 to 100
    #[validate(range(min = 0, max = 100, message = "must be between 0 and 100"))]
    pub discount: Option<i32>,
    pub category_id: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(min = 1, max = 255, message = "must be 1 to 255 characters"))]
    pub product_name: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price: Option<i64>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(range(min = 0, max = 100, message = "must be between 0 and 100"))]
    pub discount: Option<i32>,
    pub category_id: Option<i32>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<ProductListItem>)]
    pub items: Vec<ProductListItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeStatus {
    pub product_id: i32,
    pub liked: bool,
    pub likes: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Deleted {
    pub id: i32,
}
