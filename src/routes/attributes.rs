use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    routing::get,
};

use crate::{
    cache::{CachePolicy, ResponseCache, SHORT_TTL, cache_response},
    dto::attributes::{AttributeList, AttributeValueList, ProductAttributeList},
    error::AppResult,
    response::ApiResponse,
    routes::params::{AttributeKeyFilter, AttributeValueFilter, ListParams, Pagination},
    services::attribute_service,
    state::AppState,
};

pub fn key_router(cache: &ResponseCache) -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_attribute_keys).layer(middleware::from_fn_with_state(
            CachePolicy::new(cache, SHORT_TTL),
            cache_response,
        )),
    )
}

pub fn value_router(cache: &ResponseCache) -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_attribute_values).layer(middleware::from_fn_with_state(
            CachePolicy::new(cache, SHORT_TTL),
            cache_response,
        )),
    )
}

#[utoipa::path(
    get,
    path = "/api/attribute-keys",
    params(Pagination, ListParams, AttributeKeyFilter),
    responses(
        (status = 200, description = "Attribute keys", body = ApiResponse<AttributeList>)
    ),
    tag = "Attributes"
)]
pub async fn list_attribute_keys(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(params): Query<ListParams>,
    Query(filter): Query<AttributeKeyFilter>,
) -> AppResult<Json<ApiResponse<AttributeList>>> {
    let resp = attribute_service::list_attribute_keys(&state, pagination, params, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/attribute-values",
    params(Pagination, ListParams, AttributeValueFilter),
    responses(
        (status = 200, description = "Attribute values", body = ApiResponse<AttributeValueList>)
    ),
    tag = "Attributes"
)]
pub async fn list_attribute_values(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(params): Query<ListParams>,
    Query(filter): Query<AttributeValueFilter>,
) -> AppResult<Json<ApiResponse<AttributeValueList>>> {
    let resp =
        attribute_service::list_attribute_values(&state, pagination, params, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/attributes",
    params(
        ("id" = i32, Path, description = "Product ID"),
        Pagination,
        ListParams
    ),
    responses(
        (status = 200, description = "Key/value attributes of one product", body = ApiResponse<ProductAttributeList>)
    ),
    tag = "Attributes"
)]
pub async fn list_product_attributes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(pagination): Query<Pagination>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<ProductAttributeList>>> {
    let resp =
        attribute_service::list_product_attributes(&state, id, pagination, params).await?;
    Ok(Json(resp))
}
