#![warn(clippy::all)]

//! Cancer Atlas client data layer.
//!
//! This crate is the data and view-state core of a web-based cancer
//! statistics choropleth dashboard. It fetches geographic boundaries,
//! the hierarchical measures catalog, and per-region values from the
//! backend API, and keeps the selected view synchronized with the
//! browser URL so views survive reloads and can be shared as links.
//!
//! Presentation (map canvas, legend, sliders) lives in the hosting
//! application; this crate only hands it typed data and reactive URL
//! bindings. All browser I/O is behind `wasm32` gates, so the complete
//! logic tests natively against in-memory doubles.

pub mod api;
pub mod config;
pub mod dom;
pub mod params;
pub mod query;
pub mod state;

pub use api::{
    get_facets, get_geometry, get_values, ApiClient, ApiError, Facet, FacetTree, FipsValue,
    ResponseCache, ValuesResult,
};
pub use config::ApiConfig;
pub use params::{boolean_param, number_param, string_param, MemoryParamStore, ParamCodec, ParamStore, UrlParam};
#[cfg(target_arch = "wasm32")]
pub use params::BrowserParamStore;
pub use state::ViewState;

/// Routes Rust panics to the browser console. Call once at startup.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
