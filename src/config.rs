//! API root configuration.
//!
//! The backend location is a single value injected at build or load time:
//! `ATLAS_API_ROOT` at compile time, or a `window.ATLAS_API_ROOT` global set
//! by the hosting page before the wasm module loads.

/// API root used when nothing is injected.
pub const DEFAULT_API_ROOT: &str = "/api";

/// Configuration for the backend API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL all request paths are joined onto, without a trailing slash.
    pub api_root: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let root = option_env!("ATLAS_API_ROOT").unwrap_or(DEFAULT_API_ROOT);
        Self::new(root)
    }
}

impl ApiConfig {
    /// Creates a configuration with the given API root.
    pub fn new(api_root: impl Into<String>) -> Self {
        let mut api_root = api_root.into();
        while api_root.ends_with('/') {
            api_root.pop();
        }
        Self { api_root }
    }

    /// Reads the API root from the `window.ATLAS_API_ROOT` global, falling
    /// back to the build-time default when the page doesn't set one.
    #[cfg(target_arch = "wasm32")]
    pub fn from_window() -> Self {
        let injected = web_sys::window()
            .and_then(|window| {
                js_sys::Reflect::get(&window, &wasm_bindgen::JsValue::from_str("ATLAS_API_ROOT"))
                    .ok()
            })
            .and_then(|value| value.as_string());

        match injected {
            Some(root) => {
                log::info!("Using injected API root: {}", root);
                Self::new(root)
            }
            None => Self::default(),
        }
    }

    /// Joins a request path onto the API root.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_normalizes_slashes() {
        let config = ApiConfig::new("https://atlas.example/api/");
        assert_eq!(
            config.join("/stats/measures"),
            "https://atlas.example/api/stats/measures"
        );
        assert_eq!(config.join("county"), "https://atlas.example/api/county");
    }

    #[test]
    fn test_default_root() {
        let config = ApiConfig::default();
        assert!(!config.api_root.ends_with('/'));
    }
}
