use axum::{Router, middleware};

use crate::{cache::invalidate_on_write, state::AppState};

pub mod attributes;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod doc;
pub mod health;
pub mod images;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router(state: &AppState) -> Router<AppState> {
    let cache = &state.cache;
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router(cache))
        .nest("/products", products::router(cache))
        .nest("/attribute-keys", attributes::key_router(cache))
        .nest("/attribute-values", attributes::value_router(cache))
        .nest("/images", images::router(state.config.max_upload_bytes))
        .layer(middleware::from_fn_with_state(
            cache.clone(),
            invalidate_on_write,
        ))
}
