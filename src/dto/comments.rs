use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Comment;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCommentRequest {
    pub positive_message: String,
    pub negative_message: String,
    /// 0 to 5, default 0
    #[validate(range(min = 0, max = 5, message = "must be between 0 and 5"))]
    pub rating: Option<i32>,
    /// Reference to an already uploaded file
    pub file: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CommentList {
    #[schema(value_type = Vec<Comment>)]
    pub items: Vec<Comment>,
}
