use serde::Serialize;

use crate::entity::{categories, products};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Category,
    Product,
}

impl RecordKind {
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Category => "Category",
            RecordKind::Product => "Product",
        }
    }

    /// Directory under the archive root holding deleted records of this kind.
    pub fn archive_dir(self) -> &'static str {
        match self {
            RecordKind::Category => "deleted_category",
            RecordKind::Product => "deleted_products",
        }
    }

    pub fn file_prefix(self) -> &'static str {
        match self {
            RecordKind::Category => "category",
            RecordKind::Product => "product",
        }
    }
}

/// A persisted catalog row the change hooks know how to describe.
pub trait CatalogRecord: Send + Sync {
    fn kind(&self) -> RecordKind;

    fn record_id(&self) -> i32;

    fn display_name(&self) -> &str;

    /// Snapshot written before deletion, as pretty JSON.
    fn archive_json(&self) -> Result<Vec<u8>, serde_json::Error>;
}

#[derive(Serialize)]
struct CategorySnapshot<'a> {
    id: i32,
    category_name: &'a str,
    slug: Option<&'a str>,
}

#[derive(Serialize)]
struct ProductSnapshot<'a> {
    id: i32,
    product_name: &'a str,
    description: Option<&'a str>,
    price: i64,
    discount: i32,
    slug: Option<&'a str>,
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

impl CatalogRecord for categories::Model {
    fn kind(&self) -> RecordKind {
        RecordKind::Category
    }

    fn record_id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.category_name
    }

    fn archive_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        to_pretty_json(&CategorySnapshot {
            id: self.id,
            category_name: &self.category_name,
            slug: self.slug.as_deref(),
        })
    }
}

impl CatalogRecord for products::Model {
    fn kind(&self) -> RecordKind {
        RecordKind::Product
    }

    fn record_id(&self) -> i32 {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.product_name
    }

    fn archive_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        to_pretty_json(&ProductSnapshot {
            id: self.id,
            product_name: &self.product_name,
            description: self.description.as_deref(),
            price: self.price,
            discount: self.discount,
            slug: self.slug.as_deref(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_snapshot_keeps_field_order() {
        let now = chrono::Utc::now().fixed_offset();
        let model = categories::Model {
            id: 5,
            category_name: "Phones".into(),
            slug: Some("phones".into()),
            created_at: now,
            updated_at: now,
        };
        let json = String::from_utf8(model.archive_json().unwrap()).unwrap();
        assert_eq!(
            json,
            "{\n    \"id\": 5,\n    \"category_name\": \"Phones\",\n    \"slug\": \"phones\"\n}"
        );
    }
}
