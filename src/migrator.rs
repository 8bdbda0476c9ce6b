use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entity::{
    AttributeValues, Attributes, Categories, Comments, Images, ProductAttributes, ProductLikes,
    Products, Users,
};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_catalog_tables::Migration)]
    }
}

async fn create_from_entity<E>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let schema = Schema::new(manager.get_database_backend());
    manager
        .create_table(schema.create_table_from_entity(entity).if_not_exists().to_owned())
        .await
}

async fn drop_if_exists<E>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}

mod m20250101_000001_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Parents first so foreign keys resolve on Postgres.
            create_from_entity(manager, Users).await?;
            create_from_entity(manager, Categories).await?;
            create_from_entity(manager, Products).await?;
            create_from_entity(manager, ProductLikes).await?;
            create_from_entity(manager, Images).await?;
            create_from_entity(manager, Comments).await?;
            create_from_entity(manager, Attributes).await?;
            create_from_entity(manager, AttributeValues).await?;
            create_from_entity(manager, ProductAttributes).await?;
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            drop_if_exists(manager, ProductAttributes).await?;
            drop_if_exists(manager, AttributeValues).await?;
            drop_if_exists(manager, Attributes).await?;
            drop_if_exists(manager, Comments).await?;
            drop_if_exists(manager, Images).await?;
            drop_if_exists(manager, ProductLikes).await?;
            drop_if_exists(manager, Products).await?;
            drop_if_exists(manager, Categories).await?;
            drop_if_exists(manager, Users).await?;
            Ok(())
        }
    }
}
