//! Backend API access.
//!
//! All data reaching the dashboard flows through this module: the shared
//! request/cache client, the geometry adapter, the facet tree builder, and
//! the per-region values fetcher. Errors are never handled here; they
//! propagate to the presentation layer, which owns display/retry policy.

mod client;
mod facets;
mod geometry;
mod transport;
mod values;

pub use client::{ApiClient, ResponseCache};
pub use facets::{get_facets, Facet, FacetTree};
pub use geometry::get_geometry;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method};
pub use values::{get_values, FipsValue, ValuesResult};

#[cfg(target_arch = "wasm32")]
pub use transport::FetchTransport;

/// Errors that can occur while talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-success status.
    Http { status: u16, url: String },
    /// The request never produced a response (network failure, fetch
    /// rejection, missing browser environment).
    Transport(String),
    /// The response body or an embedded geometry string was not valid JSON.
    Decode(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http { status, url } => {
                write!(f, "Request to {} failed with status {}", url, status)
            }
            ApiError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ApiError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
