use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use validator::Validate;

use crate::dto::comments::{CommentList, CreateCommentRequest};
use crate::{
    entity::comments::{ActiveModel, Column, Entity as Comments},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Comment,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::product_service::find_product,
    state::AppState,
};

pub async fn list_comments(
    state: &AppState,
    product_id: i32,
    pagination: Pagination,
) -> AppResult<ApiResponse<CommentList>> {
    find_product(&state.orm, product_id).await?;
    let (_, limit, offset) = pagination.normalize();

    let finder = Comments::find()
        .filter(Column::ProductId.eq(product_id))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id);
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Comment::from)
        .collect();

    let meta = Meta::paged(&pagination, total);
    Ok(ApiResponse::success("Comments", CommentList { items }, Some(meta)))
}

pub async fn add_comment(
    state: &AppState,
    user: &AuthUser,
    product_id: i32,
    payload: CreateCommentRequest,
) -> AppResult<ApiResponse<Comment>> {
    payload.validate()?;
    find_product(&state.orm, product_id).await?;

    let now = Utc::now().fixed_offset();
    let comment = ActiveModel {
        id: NotSet,
        negative_message: Set(payload.negative_message),
        positive_message: Set(payload.positive_message),
        rating: Set(payload.rating.unwrap_or(0)),
        file: Set(payload.file.filter(|f| !f.is_empty())),
        product_id: Set(product_id),
        user_id: Set(user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id, comment_id = comment.id, "comment added");

    Ok(ApiResponse::success(
        "Comment created",
        Comment::from(comment),
        Some(Meta::empty()),
    ))
}
