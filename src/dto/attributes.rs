use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Attribute, AttributeValue, ProductAttribute};

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct AttributeList {
    #[schema(value_type = Vec<Attribute>)]
    pub items: Vec<Attribute>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct AttributeValueList {
    #[schema(value_type = Vec<AttributeValue>)]
    pub items: Vec<AttributeValue>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductAttributeList {
    #[schema(value_type = Vec<ProductAttribute>)]
    pub items: Vec<ProductAttribute>,
}
