//! Time-bounded response cache for read endpoints.
//!
//! Successful `GET` responses are stored under the request path, query and
//! `Authorization` header for the TTL of the route. Any successful write
//! through the API clears the whole cache.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    body::{Body, Bytes},
    extract::{OriginalUri, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

const MAX_CACHED_BODY: usize = 8 * 1024 * 1024;

const DEFAULT_CAPACITY: usize = 1024;

pub const SHORT_TTL: Duration = Duration::from_secs(30);
pub const LONG_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone)]
struct CachedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    expires_at: Instant,
}

impl CachedResponse {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    fn to_response(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
            .headers_mut()
            .insert(X_CACHE, HeaderValue::from_static("HIT"));
        response
    }
}

/// Bounded map of cached responses. When full, expired entries are swept
/// before a new one is stored; if it is still full the response is served
/// uncached.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<DashMap<String, CachedResponse>>,
    capacity: usize,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    fn get(&self, key: &str) -> Option<Response> {
        let hit = self.entries.get(key).map(|entry| entry.clone())?;
        if hit.is_expired() {
            self.entries.remove(key);
            return None;
        }
        Some(hit.to_response())
    }

    fn insert(
        &self,
        key: String,
        status: StatusCode,
        headers: &HeaderMap,
        body: Bytes,
        ttl: Duration,
    ) -> bool {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            self.entries.retain(|_, entry| !entry.is_expired());
            if self.entries.len() >= self.capacity {
                return false;
            }
        }
        self.entries.insert(
            key,
            CachedResponse {
                status,
                headers: headers.clone(),
                body,
                expires_at: Instant::now() + ttl,
            },
        );
        true
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache plus the TTL of the route it is layered on.
#[derive(Clone)]
pub struct CachePolicy {
    cache: ResponseCache,
    ttl: Duration,
}

impl CachePolicy {
    pub fn new(cache: &ResponseCache, ttl: Duration) -> Self {
        Self {
            cache: cache.clone(),
            ttl,
        }
    }
}

fn cache_key(request: &Request) -> String {
    // Nested routers see a stripped path; key on the full one.
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| request.uri());
    let auth = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");
    match uri.query() {
        Some(query) => format!("{}?{}|{}", uri.path(), query, auth),
        None => format!("{}|{}", uri.path(), auth),
    }
}

pub async fn cache_response(
    State(policy): State<CachePolicy>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = cache_key(&request);
    if let Some(hit) = policy.cache.get(&key) {
        tracing::debug!(key = %key, "cache hit");
        return hit;
    }

    let response = next.run(request).await;
    if !response.status().is_success() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_CACHED_BODY).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "response body not cacheable");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let stored = policy
        .cache
        .insert(key.clone(), parts.status, &parts.headers, bytes.clone(), policy.ttl);
    if stored {
        tracing::debug!(key = %key, ttl_secs = policy.ttl.as_secs(), "cache miss");
    } else {
        tracing::debug!(key = %key, entries = policy.cache.len(), "response cache full, not stored");
    }

    parts.headers.insert(X_CACHE, HeaderValue::from_static("MISS"));
    Response::from_parts(parts, Body::from(bytes))
}

pub async fn invalidate_on_write(
    State(cache): State<ResponseCache>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method();
    let writes = method != Method::GET && method != Method::HEAD && method != Method::OPTIONS;
    let response = next.run(request).await;
    if writes && response.status().is_success() && !cache.is_empty() {
        tracing::debug!(entries = cache.len(), "write succeeded, clearing response cache");
        cache.clear();
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_entries_are_dropped() {
        let cache = ResponseCache::new();
        cache.insert(
            "/x|-".into(),
            StatusCode::OK,
            &HeaderMap::new(),
            Bytes::from_static(b"{}"),
            Duration::ZERO,
        );
        assert!(cache.get("/x|-").is_none());
        assert!(cache.is_empty());
    }

    fn store(cache: &ResponseCache, key: &str, ttl: Duration) -> bool {
        cache.insert(
            key.into(),
            StatusCode::OK,
            &HeaderMap::new(),
            Bytes::from_static(b"{}"),
            ttl,
        )
    }

    #[test]
    fn full_cache_sweeps_expired_entries() {
        let cache = ResponseCache::with_capacity(3);
        for i in 0..3 {
            assert!(store(&cache, &format!("/stale/{i}|-"), Duration::ZERO));
        }
        assert_eq!(cache.len(), 3);

        assert!(store(&cache, "/fresh|-", Duration::from_secs(60)));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("/fresh|-").is_some());
    }

    #[test]
    fn full_cache_of_live_entries_stops_growing() {
        let cache = ResponseCache::with_capacity(2);
        assert!(store(&cache, "/a|-", Duration::from_secs(60)));
        assert!(store(&cache, "/b|-", Duration::from_secs(60)));
        assert!(!store(&cache, "/c|-", Duration::from_secs(60)));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("/c|-").is_none());

        // Refreshing a key already held is still allowed.
        assert!(store(&cache, "/a|-", Duration::from_secs(60)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn hit_replays_status_and_marks_header() {
        let cache = ResponseCache::new();
        cache.insert(
            "/x|-".into(),
            StatusCode::OK,
            &HeaderMap::new(),
            Bytes::from_static(b"{}"),
            Duration::from_secs(60),
        );
        let hit = cache.get("/x|-").unwrap();
        assert_eq!(hit.status(), StatusCode::OK);
        assert_eq!(hit.headers().get(X_CACHE).unwrap(), "HIT");
    }

    #[test]
    fn key_separates_query_and_credentials() {
        let anonymous = Request::builder()
            .uri("/api/products?page=2")
            .body(Body::empty())
            .unwrap();
        let signed = Request::builder()
            .uri("/api/products?page=2")
            .header(header::AUTHORIZATION, "Bearer abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(cache_key(&anonymous), "/api/products?page=2|-");
        assert_ne!(cache_key(&anonymous), cache_key(&signed));
    }
}
