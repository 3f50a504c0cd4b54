//! URL-synchronized view state.
//!
//! Selected level/category/measure and the map viewport live in the
//! browser's query string so reloading restores the view and URLs can be
//! shared. [`UrlParam`] binds one in-memory value to one named parameter;
//! [`ParamStore`] abstracts the query string itself so the binding logic
//! tests natively against an in-memory store.

mod binder;
mod codec;

pub use binder::{UrlParam, URL_WRITE_DEBOUNCE};
pub use codec::{boolean_param, number_param, string_param, ParamCodec};

use crate::query;

/// External key-value store a [`UrlParam`] synchronizes against.
///
/// The browser implementation is the URL query string; writes must replace
/// the current history entry, never push a new one.
pub trait ParamStore {
    /// All values present for the name, in document order.
    fn values(&self, name: &str) -> Vec<String>;

    /// Sets the parameter, collapsing duplicates to a single pair.
    fn set(&mut self, name: &str, value: &str);

    /// Removes every pair with the name.
    fn remove(&mut self, name: &str);
}

/// In-memory store used on native targets and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryParamStore {
    pairs: Vec<(String, String)>,
}

impl MemoryParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store from a query string (with or without the `?`).
    pub fn from_query(search: &str) -> Self {
        Self {
            pairs: query::parse(search),
        }
    }

    /// Current contents as a query string without the leading `?`.
    pub fn query(&self) -> String {
        query::build(&self.pairs)
    }

    /// First value for the name, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl ParamStore for MemoryParamStore {
    fn values(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect()
    }

    fn set(&mut self, name: &str, value: &str) {
        self.remove(name);
        self.pairs.push((name.to_string(), value.to_string()));
    }

    fn remove(&mut self, name: &str) {
        self.pairs.retain(|(key, _)| key != name);
    }
}

/// Store backed by the browser URL: reads `location.search`, writes with
/// `history.replaceState`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserParamStore;

#[cfg(target_arch = "wasm32")]
impl BrowserParamStore {
    pub fn new() -> Self {
        Self
    }

    fn pairs(&self) -> Vec<(String, String)> {
        let window = web_sys::window().expect("no window");
        match window.location().search() {
            Ok(search) => query::parse(&search),
            Err(_) => Vec::new(),
        }
    }

    fn write(&self, pairs: &[(String, String)]) {
        let window = web_sys::window().expect("no window");
        let pathname = window.location().pathname().unwrap_or_default();

        let built = query::build(pairs);
        let url = if built.is_empty() {
            pathname
        } else {
            format!("{}?{}", pathname, built)
        };

        let history = window.history().expect("no history");
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url));
    }
}

#[cfg(target_arch = "wasm32")]
impl ParamStore for BrowserParamStore {
    fn values(&self, name: &str) -> Vec<String> {
        self.pairs()
            .into_iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value)
            .collect()
    }

    fn set(&mut self, name: &str, value: &str) {
        let mut pairs = self.pairs();
        pairs.retain(|(key, _)| key != name);
        pairs.push((name.to_string(), value.to_string()));
        self.write(&pairs);
    }

    fn remove(&mut self, name: &str) {
        let mut pairs = self.pairs();
        pairs.retain(|(key, _)| key != name);
        self.write(&pairs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryParamStore::from_query("?level=county&zoom=7.00000");
        assert_eq!(store.get("level"), Some("county"));
        assert_eq!(store.values("zoom"), vec!["7.00000".to_string()]);

        store.set("level", "tract");
        store.remove("zoom");
        assert_eq!(store.query(), "level=tract");
    }

    #[test]
    fn test_set_collapses_duplicates() {
        let mut store = MemoryParamStore::from_query("a=1&a=2&b=3");
        assert_eq!(store.values("a").len(), 2);

        store.set("a", "4");
        assert_eq!(store.values("a"), vec!["4".to_string()]);
        assert_eq!(store.query(), "b=3&a=4");
    }
}
