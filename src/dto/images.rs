use utoipa::ToSchema;

/// Multipart form accepted by the image upload endpoint.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ImageUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub product_id: Option<i32>,
    pub category_id: Option<i32>,
    pub is_primary: Option<bool>,
}

/// Decoded upload handed to the image service.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub product_id: Option<i32>,
    pub category_id: Option<i32>,
    pub is_primary: bool,
}
