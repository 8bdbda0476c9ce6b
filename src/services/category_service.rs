use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait,
    DatabaseTransaction, EntityTrait, LoaderTrait, ModelTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use validator::Validate;

use crate::dto::categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest};
use crate::dto::products::Deleted;
use crate::{
    entity::{
        categories::{self, ActiveModel, Column, Entity as Categories},
        images::{self, Entity as Images},
        products::{self, Entity as Products},
    },
    error::{AppError, AppResult},
    hooks::{CatalogRecord, ChangeEvent},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, CategoryDetail, CategoryWithProducts, Image, Product},
    query::ListSpec,
    response::{ApiResponse, Meta},
    routes::params::{CategoryFilter, ListParams, Pagination},
    services::product_service::purge_products,
    slugs::slug_or_derive,
    state::AppState,
};

fn list_spec() -> ListSpec {
    ListSpec::new()
        .search_on((Categories, Column::CategoryName))
        .order_on("category_name", (Categories, Column::CategoryName))
        .default_order((Categories, Column::Id), Order::Asc)
}

pub(crate) async fn find_by_slug<C>(db: &C, slug: &str) -> AppResult<categories::Model>
where
    C: ConnectionTrait,
{
    Categories::find()
        .filter(Column::Slug.eq(slug))
        .order_by_asc(Column::Id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_unique_name<C>(db: &C, name: &str, except: Option<i32>) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let mut condition = Condition::all().add(Column::CategoryName.eq(name));
    if let Some(id) = except {
        condition = condition.add(Column::Id.ne(id));
    }
    if Categories::find().filter(condition).one(db).await?.is_some() {
        return Err(AppError::invalid(
            "category_name",
            "category with this category name already exists.",
        ));
    }
    Ok(())
}

pub async fn list_categories(
    state: &AppState,
    pagination: Pagination,
    params: ListParams,
    filter: CategoryFilter,
) -> AppResult<ApiResponse<CategoryList>> {
    let (_, limit, offset) = pagination.normalize();

    let mut condition = Condition::all();
    if let Some(name) = filter.category_name.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::CategoryName.eq(name.clone()));
    }

    let finder = list_spec().apply(Categories::find().filter(condition), &params);
    let total = finder.clone().count(&state.orm).await?;

    let categories = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let products = categories.load_many(Products, &state.orm).await?;

    let items = categories
        .into_iter()
        .zip(products)
        .map(|(category, products)| CategoryWithProducts {
            category: Category::from(category),
            products: products.into_iter().map(Product::from).collect(),
        })
        .collect();

    let meta = Meta::paged(&pagination, total);
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(meta),
    ))
}

pub async fn get_category(state: &AppState, slug: &str) -> AppResult<ApiResponse<CategoryDetail>> {
    let category = find_by_slug(&state.orm, slug).await?;
    let products = category
        .find_related(Products)
        .order_by_asc(products::Column::Id)
        .all(&state.orm)
        .await?;
    let images = category
        .find_related(Images)
        .order_by_asc(images::Column::Id)
        .all(&state.orm)
        .await?;

    let detail = CategoryDetail {
        category: Category::from(category),
        products: products.into_iter().map(Product::from).collect(),
        images: images.into_iter().map(Image::from).collect(),
    };
    Ok(ApiResponse::success("Category", detail, None))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;

    let name = payload.category_name.trim().to_string();
    ensure_unique_name(&state.orm, &name, None).await?;

    let now = Utc::now().fixed_offset();
    let category = ActiveModel {
        id: NotSet,
        slug: Set(Some(slug_or_derive(payload.slug, &name))),
        category_name: Set(name),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;

    state.hooks.dispatch(ChangeEvent::Created(&category)).await?;

    Ok(ApiResponse::success(
        "Category created",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = find_by_slug(&state.orm, slug).await?;
    let id = existing.id;
    let mut active: ActiveModel = existing.into();

    if let Some(name) = payload.category_name {
        let name = name.trim().to_string();
        ensure_unique_name(&state.orm, &name, Some(id)).await?;
        active.category_name = Set(name);
    }
    // The slug is fixed at creation; only an explicit value replaces it.
    if let Some(slug) = payload.slug.filter(|s| !s.trim().is_empty()) {
        active.slug = Set(Some(slug));
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let category = active.update(&state.orm).await?;
    state.hooks.dispatch(ChangeEvent::Updated(&category)).await?;

    Ok(ApiResponse::success(
        "Updated",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

/// Archives the category and every product it owns, then deletes them.
/// Nothing is removed unless every archive write succeeds.
async fn remove_category_rows(
    txn: DatabaseTransaction,
    category_id: i32,
    product_ids: &[i32],
) -> AppResult<()> {
    purge_products(&txn, product_ids).await?;
    Images::delete_many()
        .filter(images::Column::CategoryId.eq(category_id))
        .exec(&txn)
        .await?;
    Categories::delete_by_id(category_id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
) -> AppResult<ApiResponse<Deleted>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let category = find_by_slug(&txn, slug).await?;
    let products = Products::find()
        .filter(products::Column::CategoryId.eq(category.id))
        .order_by_asc(products::Column::Id)
        .all(&txn)
        .await?;

    let mut records: Vec<&dyn CatalogRecord> =
        products.iter().map(|p| p as &dyn CatalogRecord).collect();
    records.push(&category);
    state.hooks.dispatch_deleting(&records).await?;

    let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    if let Err(err) = remove_category_rows(txn, category.id, &product_ids).await {
        state.hooks.revert_deleting(&records).await;
        return Err(err);
    }

    tracing::info!(
        category_id = category.id,
        products = product_ids.len(),
        "category deleted"
    );

    Ok(ApiResponse::success(
        "Deleted",
        Deleted { id: category.id },
        Some(Meta::empty()),
    ))
}
