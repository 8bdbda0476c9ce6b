use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};

use crate::{
    cache::{CachePolicy, LONG_TTL, ResponseCache, SHORT_TTL, cache_response},
    dto::products::{CreateProductRequest, Deleted, LikeStatus, ProductList, UpdateProductRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Product, ProductDetail},
    response::ApiResponse,
    routes::{
        attributes, comments,
        params::{ListParams, Pagination, ProductFilter},
    },
    services::product_service,
    state::AppState,
};

pub fn router(cache: &ResponseCache) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_products)
                .post(create_product)
                .layer(middleware::from_fn_with_state(
                    CachePolicy::new(cache, SHORT_TTL),
                    cache_response,
                )),
        )
        .route(
            "/{id}",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .layer(middleware::from_fn_with_state(
                    CachePolicy::new(cache, LONG_TTL),
                    cache_response,
                )),
        )
        .route("/{id}/like", post(like_product).delete(unlike_product))
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route(
            "/{id}/attributes",
            get(attributes::list_product_attributes),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(Pagination, ListParams, ProductFilter),
    responses(
        (status = 200, description = "List products with like counts", body = ApiResponse<ProductList>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<Pagination>,
    Query(params): Query<ListParams>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, pagination, params, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product detail with derived prices", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Archived and deleted product", body = ApiResponse<Deleted>),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let resp = product_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/like",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product liked", body = ApiResponse<LikeStatus>),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn like_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<LikeStatus>>> {
    let resp = product_service::like_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/like",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Like removed", body = ApiResponse<LikeStatus>),
        (status = 404, description = "Like not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn unlike_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<LikeStatus>>> {
    let resp = product_service::unlike_product(&state, &user, id).await?;
    Ok(Json(resp))
}
