pub mod attribute_values;
pub mod attributes;
pub mod categories;
pub mod comments;
pub mod images;
pub mod product_attributes;
pub mod product_likes;
pub mod products;
pub mod users;

pub use attribute_values::Entity as AttributeValues;
pub use attributes::Entity as Attributes;
pub use categories::Entity as Categories;
pub use comments::Entity as Comments;
pub use images::Entity as Images;
pub use product_attributes::Entity as ProductAttributes;
pub use product_likes::Entity as ProductLikes;
pub use products::Entity as Products;
pub use users::Entity as Users;
