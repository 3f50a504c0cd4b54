//! Shared request/cache client.
//!
//! Every fetch-adapter funnels through [`ApiClient`]: one GET per distinct
//! request fingerprint per session. The cache holds completed responses
//! only, so two concurrent calls for the same uncached URL both hit the
//! network; deduplicating in-flight requests is deliberately out of scope.
//! There is no size bound, TTL, or invalidation short of dropping the
//! cache instance.

use super::transport::{HttpRequest, HttpTransport};
use super::ApiError;
use crate::config::ApiConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Session-lifetime memo of parsed GET responses, keyed by request
/// fingerprint.
///
/// Constructed once per application instance and handed to the client,
/// so isolated instances (and tests) never share state.
#[derive(Clone, Default)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached response for a fingerprint, if any.
    pub fn get(&self, fingerprint: &str) -> Option<Value> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(fingerprint).cloned())
    }

    /// Stores a completed response.
    pub fn insert(&self, fingerprint: String, response: Value) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(fingerprint, response);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all cached responses.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

/// Backend API client: GET, parse JSON, memoize.
pub struct ApiClient<T> {
    config: ApiConfig,
    transport: T,
    cache: ResponseCache,
}

impl<T: HttpTransport> ApiClient<T> {
    /// Creates a client with its own fresh response cache.
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self::with_cache(config, transport, ResponseCache::new())
    }

    /// Creates a client sharing an externally owned cache.
    pub fn with_cache(config: ApiConfig, transport: T, cache: ResponseCache) -> Self {
        Self {
            config,
            transport,
            cache,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Joins a request path onto the configured API root.
    pub fn url(&self, path: &str) -> String {
        self.config.join(path)
    }

    /// Fetches a URL and parses the body as JSON, regardless of the
    /// response content-type.
    ///
    /// Cached GET responses are returned without any network I/O. A
    /// non-2xx status is an error carrying the status and URL; nothing is
    /// cached on any failure.
    pub async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let request = HttpRequest::get(url);
        let fingerprint = request.fingerprint();

        if request.method.is_cacheable() {
            if let Some(hit) = self.cache.get(&fingerprint) {
                log::debug!("Cache hit for {}", url);
                return Ok(hit);
            }
        }

        log::debug!("GET {}", url);
        let response = self.transport.execute(&request).await?;

        if !response.is_success() {
            log::warn!("GET {} failed with status {}", url, response.status);
            return Err(ApiError::Http {
                status: response.status,
                url: url.to_string(),
            });
        }

        let parsed: Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        if request.method.is_cacheable() {
            self.cache.insert(fingerprint, parsed.clone());
        }

        Ok(parsed)
    }
}

/// Convenience constructor for the browser client.
#[cfg(target_arch = "wasm32")]
impl ApiClient<super::transport::FetchTransport> {
    /// Client wired to the browser `fetch` API, with the API root taken
    /// from the hosting page.
    pub fn browser() -> Self {
        Self::new(
            ApiConfig::from_window(),
            super::transport::FetchTransport,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StubTransport;
    use serde_json::json;

    fn client(transport: StubTransport) -> ApiClient<StubTransport> {
        ApiClient::new(ApiConfig::new("/api"), transport)
    }

    #[test]
    fn test_get_json_parses_body() {
        let api = client(StubTransport::new().respond("/api/county", 200, r#"[{"FIPS": 19153}]"#));
        let value = pollster::block_on(api.get_json("/api/county")).unwrap();
        assert_eq!(value, json!([{"FIPS": 19153}]));
    }

    #[test]
    fn test_second_get_is_served_from_cache() {
        let api = client(StubTransport::new().respond("/api/county", 200, r#"{"a": 1}"#));

        let first = pollster::block_on(api.get_json("/api/county")).unwrap();
        let second = pollster::block_on(api.get_json("/api/county")).unwrap();

        assert_eq!(first, second);
        assert_eq!(api.transport().calls(), 1);
        assert_eq!(api.cache().len(), 1);
    }

    #[test]
    fn test_non_success_status_is_an_error_and_not_cached() {
        let api = client(StubTransport::new().respond("/api/county", 500, "oops"));

        let err = pollster::block_on(api.get_json("/api/county")).unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 500,
                url: "/api/county".to_string()
            }
        );
        assert!(api.cache().is_empty());

        // A later call must hit the network again.
        let _ = pollster::block_on(api.get_json("/api/county"));
        assert_eq!(api.transport().calls(), 2);
    }

    #[test]
    fn test_malformed_json_is_a_decode_error_and_not_cached() {
        let api = client(StubTransport::new().respond("/api/county", 200, "<html>"));

        let err = pollster::block_on(api.get_json("/api/county")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(api.cache().is_empty());
    }

    #[test]
    fn test_shared_cache_spans_clients() {
        let cache = ResponseCache::new();
        let first = ApiClient::with_cache(
            ApiConfig::new("/api"),
            StubTransport::new().respond("/api/county", 200, "[]"),
            cache.clone(),
        );
        let second = ApiClient::with_cache(
            ApiConfig::new("/api"),
            StubTransport::new(),
            cache,
        );

        pollster::block_on(first.get_json("/api/county")).unwrap();
        // Second client has no canned response; only the shared cache can
        // satisfy this call.
        let value = pollster::block_on(second.get_json("/api/county")).unwrap();
        assert_eq!(value, json!([]));
        assert_eq!(second.transport().calls(), 0);
    }

    #[test]
    fn test_url_joins_api_root() {
        let api = client(StubTransport::new());
        assert_eq!(api.url("stats/measures"), "/api/stats/measures");
    }
}
