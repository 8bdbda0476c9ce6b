use sea_orm::entity::prelude::*;

/// Typed key/value pair attached to a product.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product_attributes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub key_id: i32,
    pub value_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "Cascade"
    )]
    Products,
    #[sea_orm(
        belongs_to = "super::attributes::Entity",
        from = "Column::KeyId",
        to = "super::attributes::Column::Id",
        on_delete = "Cascade"
    )]
    Attributes,
    #[sea_orm(
        belongs_to = "super::attribute_values::Entity",
        from = "Column::ValueId",
        to = "super::attribute_values::Column::Id",
        on_delete = "Cascade"
    )]
    AttributeValues,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attributes.def()
    }
}

impl Related<super::attribute_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
