use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        attributes::{AttributeList, AttributeValueList, ProductAttributeList},
        auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        comments::{CommentList, CreateCommentRequest},
        images::ImageUploadForm,
        products::{CreateProductRequest, Deleted, LikeStatus, ProductList, UpdateProductRequest},
    },
    models::{
        Attribute, AttributeValue, Category, CategoryDetail, CategoryWithProducts, Comment, Image,
        Product, ProductAttribute, ProductDetail, ProductListItem, User,
    },
    pricing::PriceBreakdown,
    response::Meta,
    routes::{attributes, auth, categories, comments, health, images, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::like_product,
        products::unlike_product,
        comments::list_comments,
        comments::add_comment,
        attributes::list_attribute_keys,
        attributes::list_attribute_values,
        attributes::list_product_attributes,
        images::upload_image
    ),
    components(
        schemas(
            User,
            Category,
            CategoryWithProducts,
            CategoryDetail,
            Product,
            PriceBreakdown,
            ProductListItem,
            ProductDetail,
            Image,
            Comment,
            Attribute,
            AttributeValue,
            ProductAttribute,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateProductRequest,
            UpdateProductRequest,
            CreateCommentRequest,
            ImageUploadForm,
            CategoryList,
            ProductList,
            CommentList,
            AttributeList,
            AttributeValueList,
            ProductAttributeList,
            LikeStatus,
            Deleted,
            params::Pagination,
            params::ListParams,
            Meta
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Comments", description = "Product comment endpoints"),
        (name = "Attributes", description = "Product attribute endpoints"),
        (name = "Images", description = "Image upload endpoint"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
