pub mod attributes;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod images;
pub mod products;
pub mod validation;
