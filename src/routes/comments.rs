use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    dto::comments::{CommentList, CreateCommentRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Comment,
    response::ApiResponse,
    routes::params::Pagination,
    services::comment_service,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/products/{id}/comments",
    params(
        ("id" = i32, Path, description = "Product ID"),
        Pagination
    ),
    responses(
        (status = 200, description = "Comments, newest first", body = ApiResponse<CommentList>),
        (status = 404, description = "Product not found")
    ),
    tag = "Comments"
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CommentList>>> {
    let resp = comment_service::list_comments(&state, id, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/comments",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = ApiResponse<Comment>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn add_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Comment>>)> {
    let resp = comment_service::add_comment(&state, &user, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
