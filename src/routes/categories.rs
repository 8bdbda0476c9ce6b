use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
};

use crate::{
    cache::{CachePolicy, LONG_TTL, ResponseCache, SHORT_TTL, cache_response},
    dto::{
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        products::Deleted,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Category, CategoryDetail},
    response::ApiResponse,
    routes::params::{CategoryFilter, ListParams, Pagination},
    services::category_service,
    state::AppState,
};

pub fn router(cache: &ResponseCache) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_categories)
                .post(create_category)
                .layer(middleware::from_fn_with_state(
                    CachePolicy::new(cache, SHORT_TTL),
                    cache_response,
                )),
        )
        .route(
            "/{slug}",
            get(get_category)
                .put(update_category)
                .delete(delete_category)
                .layer(middleware::from_fn_with_state(
                    CachePolicy::new(cache, LONG_TTL),
                    cache_response,
                )),
        )
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(Pagination, ListParams, CategoryFilter),
    responses(
        (status = 200, description = "List categories with their products", body = ApiResponse<CategoryList>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<Pagination>,
    Query(params): Query<ListParams>,
    Query(filter): Query<CategoryFilter>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = category_service::list_categories(&state, pagination, params, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category with products and images", body = ApiResponse<CategoryDetail>),
        (status = 404, description = "Category not found")
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<CategoryDetail>>> {
    let resp = category_service::get_category(&state, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let resp = category_service::create_category(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::update_category(&state, &user, &slug, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category and its products archived and deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let resp = category_service::delete_category(&state, &user, &slug).await?;
    Ok(Json(resp))
}
