use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait,
    DatabaseTransaction, EntityTrait, LoaderTrait, ModelTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use validator::Validate;

use crate::dto::products::{
    CreateProductRequest, Deleted, LikeStatus, ProductList, UpdateProductRequest,
};
use crate::{
    entity::{
        categories::Entity as Categories,
        comments::{self, Entity as Comments},
        images::{self, Entity as Images},
        product_attributes::{self, Entity as ProductAttributes},
        product_likes::{self, Entity as ProductLikes},
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    hooks::{CatalogRecord, ChangeEvent},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Comment, Image, Product, ProductDetail, ProductListItem},
    query::ListSpec,
    response::{ApiResponse, Meta},
    routes::params::{ListParams, Pagination, ProductFilter},
    services::attribute_service::load_product_attributes,
    slugs::slug_or_derive,
    state::AppState,
};

fn list_spec() -> ListSpec {
    ListSpec::new()
        .search_on((Products, Column::ProductName))
        .search_on((Products, Column::Price))
        .order_on("product_name", (Products, Column::ProductName))
        .order_on("price", (Products, Column::Price))
        .default_order((Products, Column::Id), Order::Asc)
}

pub(crate) async fn find_product<C>(db: &C, id: i32) -> AppResult<ProductModel>
where
    C: ConnectionTrait,
{
    Products::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_category<C>(db: &C, category_id: i32) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if Categories::find_by_id(category_id).one(db).await?.is_none() {
        return Err(AppError::invalid(
            "category_id",
            format!("Invalid pk \"{category_id}\" - object does not exist."),
        ));
    }
    Ok(())
}

/// Deletes the given products together with their images, comments,
/// attributes and likes.
pub(crate) async fn purge_products<C>(db: &C, ids: &[i32]) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(());
    }
    let ids = ids.to_vec();
    ProductAttributes::delete_many()
        .filter(product_attributes::Column::ProductId.is_in(ids.clone()))
        .exec(db)
        .await?;
    Comments::delete_many()
        .filter(comments::Column::ProductId.is_in(ids.clone()))
        .exec(db)
        .await?;
    Images::delete_many()
        .filter(images::Column::ProductId.is_in(ids.clone()))
        .exec(db)
        .await?;
    ProductLikes::delete_many()
        .filter(product_likes::Column::ProductId.is_in(ids.clone()))
        .exec(db)
        .await?;
    Products::delete_many()
        .filter(Column::Id.is_in(ids))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn list_products(
    state: &AppState,
    pagination: Pagination,
    params: ListParams,
    filter: ProductFilter,
) -> AppResult<ApiResponse<ProductList>> {
    let (_, limit, offset) = pagination.normalize();

    let mut condition = Condition::all();
    if let Some(name) = filter.product_name.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::ProductName.eq(name.clone()));
    }
    if let Some(price) = filter.price {
        condition = condition.add(Column::Price.eq(price));
    }
    if let Some(category_id) = filter.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }

    let finder = list_spec().apply(Products::find().filter(condition), &params);
    let total = finder.clone().count(&state.orm).await?;

    let products = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let likes = products.load_many(ProductLikes, &state.orm).await?;

    let items = products
        .into_iter()
        .zip(likes)
        .map(|(product, likes)| ProductListItem {
            product: Product::from(product),
            likes: likes.len() as u64,
        })
        .collect();

    let meta = Meta::paged(&pagination, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: i32) -> AppResult<ApiResponse<ProductDetail>> {
    let product = find_product(&state.orm, id).await?;

    let category = product.find_related(Categories).one(&state.orm).await?;
    let likes = product.find_related(ProductLikes).count(&state.orm).await?;
    let comments = product
        .find_related(Comments)
        .order_by_desc(comments::Column::CreatedAt)
        .all(&state.orm)
        .await?;
    let images = product
        .find_related(Images)
        .order_by_desc(images::Column::IsPrimary)
        .order_by_asc(images::Column::Id)
        .all(&state.orm)
        .await?;
    let attributes =
        load_product_attributes(&state.orm, product.id, &ListParams::default(), None).await?;

    let detail = ProductDetail {
        product: Product::from(product),
        category: category.map(Category::from),
        likes,
        comments: comments.into_iter().map(Comment::from).collect(),
        images: images.into_iter().map(Image::from).collect(),
        attributes,
    };
    Ok(ApiResponse::success("Product", detail, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload.validate()?;
    ensure_category(&state.orm, payload.category_id).await?;

    let name = payload.product_name.trim().to_string();
    let now = Utc::now().fixed_offset();
    let product = ActiveModel {
        id: NotSet,
        slug: Set(Some(slug_or_derive(payload.slug, &name))),
        product_name: Set(name),
        price: Set(payload.price),
        description: Set(payload.description),
        discount: Set(payload.discount.unwrap_or(0)),
        category_id: Set(payload.category_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;

    state.hooks.dispatch(ChangeEvent::Created(&product)).await?;

    Ok(ApiResponse::success(
        "Product created",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = find_product(&state.orm, id).await?;
    let mut active: ActiveModel = existing.into();

    if let Some(name) = payload.product_name {
        active.product_name = Set(name.trim().to_string());
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    // The slug is fixed at creation; only an explicit value replaces it.
    if let Some(slug) = payload.slug.filter(|s| !s.trim().is_empty()) {
        active.slug = Set(Some(slug));
    }
    if let Some(discount) = payload.discount {
        active.discount = Set(discount);
    }
    if let Some(category_id) = payload.category_id {
        ensure_category(&state.orm, category_id).await?;
        active.category_id = Set(category_id);
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let product = active.update(&state.orm).await?;
    state.hooks.dispatch(ChangeEvent::Updated(&product)).await?;

    Ok(ApiResponse::success(
        "Updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

/// Archives the product, then deletes it with everything hanging off it.
/// A failed archive write leaves the product untouched.
async fn remove_product_rows(txn: DatabaseTransaction, product_id: i32) -> AppResult<()> {
    purge_products(&txn, &[product_id]).await?;
    txn.commit().await?;
    Ok(())
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<Deleted>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let product = find_product(&txn, id).await?;
    let records: [&dyn CatalogRecord; 1] = [&product];
    state.hooks.dispatch_deleting(&records).await?;
    if let Err(err) = remove_product_rows(txn, product.id).await {
        state.hooks.revert_deleting(&records).await;
        return Err(err);
    }

    tracing::info!(product_id = id, "product deleted");

    Ok(ApiResponse::success(
        "Deleted",
        Deleted { id },
        Some(Meta::empty()),
    ))
}

async fn like_status(state: &AppState, product_id: i32, liked: bool) -> AppResult<LikeStatus> {
    let likes = ProductLikes::find()
        .filter(product_likes::Column::ProductId.eq(product_id))
        .count(&state.orm)
        .await?;
    Ok(LikeStatus {
        product_id,
        liked,
        likes,
    })
}

pub async fn like_product(
    state: &AppState,
    user: &AuthUser,
    product_id: i32,
) -> AppResult<ApiResponse<LikeStatus>> {
    find_product(&state.orm, product_id).await?;

    let existing = ProductLikes::find_by_id((product_id, user.user_id))
        .one(&state.orm)
        .await?;
    if existing.is_none() {
        ProductLikes::insert(product_likes::ActiveModel {
            product_id: Set(product_id),
            user_id: Set(user.user_id),
        })
        .exec_without_returning(&state.orm)
        .await?;
    }

    let status = like_status(state, product_id, true).await?;
    Ok(ApiResponse::success("Liked", status, Some(Meta::empty())))
}

pub async fn unlike_product(
    state: &AppState,
    user: &AuthUser,
    product_id: i32,
) -> AppResult<ApiResponse<LikeStatus>> {
    let result = ProductLikes::delete_many()
        .filter(product_likes::Column::ProductId.eq(product_id))
        .filter(product_likes::Column::UserId.eq(user.user_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    let status = like_status(state, product_id, false).await?;
    Ok(ApiResponse::success("Unliked", status, Some(Meta::empty())))
}
