pub mod attribute_service;
pub mod auth_service;
pub mod category_service;
pub mod comment_service;
pub mod image_service;
pub mod product_service;
