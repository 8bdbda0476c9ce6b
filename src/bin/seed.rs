use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};

use axum_catalog_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        attribute_values, attributes, categories, product_attributes, products, users,
        AttributeValues, Attributes, Categories, Products, Users,
    },
    middleware::auth::{ROLE_ADMIN, ROLE_USER},
    services::auth_service::hash_password,
    slugs::slugify,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "admin", "admin@example.com", "admin1234", ROLE_ADMIN).await?;
    let user_id = ensure_user(&orm, "user", "user@example.com", "user12345", ROLE_USER).await?;
    seed_catalog(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<i32> {
    if let Some(existing) = Users::find()
        .filter(users::Column::Username.eq(username))
        .one(orm)
        .await?
    {
        println!("User {username} already present");
        return Ok(existing.id);
    }

    let user = users::ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(password)?),
        role: Set(role.to_string()),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {username} (role={role})");
    Ok(user.id)
}

async fn ensure_category(orm: &DatabaseConnection, name: &str) -> anyhow::Result<i32> {
    if let Some(existing) = Categories::find()
        .filter(categories::Column::CategoryName.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }
    let now = Utc::now().fixed_offset();
    let category = categories::ActiveModel {
        id: NotSet,
        category_name: Set(name.to_string()),
        slug: Set(Some(slugify(name))),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(orm)
    .await?;
    Ok(category.id)
}

async fn ensure_attribute(orm: &DatabaseConnection, name: &str) -> anyhow::Result<i32> {
    if let Some(existing) = Attributes::find()
        .filter(attributes::Column::AttributeName.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }
    let key = attributes::ActiveModel {
        id: NotSet,
        attribute_name: Set(name.to_string()),
    }
    .insert(orm)
    .await?;
    Ok(key.id)
}

async fn ensure_value(orm: &DatabaseConnection, value: &str) -> anyhow::Result<i32> {
    if let Some(existing) = AttributeValues::find()
        .filter(attribute_values::Column::AttributeValue.eq(value))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }
    let row = attribute_values::ActiveModel {
        id: NotSet,
        attribute_value: Set(value.to_string()),
    }
    .insert(orm)
    .await?;
    Ok(row.id)
}

async fn seed_catalog(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let catalog = [
        (
            "Smartphones",
            "Galaxy A54",
            4_200_000_i64,
            10,
            [("Memory", "128 GB"), ("Color", "Black")],
        ),
        (
            "Smartphones",
            "Redmi Note 13",
            3_100_000,
            0,
            [("Memory", "256 GB"), ("Color", "Blue")],
        ),
        (
            "Laptops",
            "ThinkPad E14",
            9_800_000,
            15,
            [("Memory", "16 GB"), ("Color", "Black")],
        ),
        (
            "Televisions",
            "Smart TV 43\"",
            5_400_000,
            5,
            [("Diagonal", "43 in"), ("Color", "Black")],
        ),
    ];

    for (category, name, price, discount, attrs) in catalog {
        let category_id = ensure_category(orm, category).await?;
        let exists = Products::find()
            .filter(products::Column::ProductName.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let now = Utc::now().fixed_offset();
        let product = products::ActiveModel {
            id: NotSet,
            product_name: Set(name.to_string()),
            price: Set(price),
            description: Set(Some(format!("{name} from the {category} range"))),
            slug: Set(Some(slugify(name))),
            discount: Set(discount),
            category_id: Set(category_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(orm)
        .await?;

        for (key, value) in attrs {
            product_attributes::ActiveModel {
                id: NotSet,
                product_id: Set(product.id),
                key_id: Set(ensure_attribute(orm, key).await?),
                value_id: Set(ensure_value(orm, value).await?),
            }
            .insert(orm)
            .await?;
        }
    }

    println!("Seeded catalog");
    Ok(())
}
