use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    entity::{attribute_values, attributes, categories, comments, images, products, users},
    pricing::PriceBreakdown,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub category_name: String,
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            category_name: model.category_name,
            slug: model.slug,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryWithProducts {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
    pub images: Vec<Image>,
}

/// A product with its derived prices.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub product_name: String,
    pub price: i64,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub discount: i32,
    pub category_id: i32,
    #[serde(flatten)]
    pub prices: PriceBreakdown,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            prices: PriceBreakdown::new(model.price, model.discount),
            id: model.id,
            product_name: model.product_name,
            price: model.price,
            description: model.description,
            slug: model.slug,
            discount: model.discount,
            category_id: model.category_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductListItem {
    #[serde(flatten)]
    pub product: Product,
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
    pub likes: u64,
    pub comments: Vec<Comment>,
    pub images: Vec<Image>,
    pub attributes: Vec<ProductAttribute>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Image {
    pub id: i32,
    pub image: String,
    pub product_id: Option<i32>,
    pub category_id: Option<i32>,
    pub is_primary: bool,
}

impl From<images::Model> for Image {
    fn from(model: images::Model) -> Self {
        Self {
            id: model.id,
            image: model.image,
            product_id: model.product_id,
            category_id: model.category_id,
            is_primary: model.is_primary,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Comment {
    pub id: i32,
    pub positive_message: String,
    pub negative_message: String,
    pub rating: i32,
    pub file: Option<String>,
    pub product_id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<comments::Model> for Comment {
    fn from(model: comments::Model) -> Self {
        Self {
            id: model.id,
            positive_message: model.positive_message,
            negative_message: model.negative_message,
            rating: model.rating,
            file: model.file,
            product_id: model.product_id,
            user_id: model.user_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Attribute {
    pub id: i32,
    pub attribute_name: String,
}

impl From<attributes::Model> for Attribute {
    fn from(model: attributes::Model) -> Self {
        Self {
            id: model.id,
            attribute_name: model.attribute_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttributeValue {
    pub id: i32,
    pub attribute_value: String,
}

impl From<attribute_values::Model> for AttributeValue {
    fn from(model: attribute_values::Model) -> Self {
        Self {
            id: model.id,
            attribute_value: model.attribute_value,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductAttribute {
    pub id: i32,
    pub product_id: i32,
    pub key: Attribute,
    pub value: AttributeValue,
}
