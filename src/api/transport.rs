//! HTTP transport abstraction.
//!
//! The client talks to the network through the `HttpTransport` trait so the
//! full request/cache pipeline can run natively against a canned transport.
//! On WASM the browser `fetch` API is the only real implementation.
//!
//! Note: this trait does not require `Send` bounds since WASM is
//! single-threaded and JS futures cannot be sent between threads.

use super::ApiError;
use std::future::Future;

/// HTTP method of an outgoing request.
///
/// Only GET responses are ever cached; the variant exists so mutating
/// requests are representable without becoming memoizable by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }

    /// Whether responses to this method may be memoized.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Method::Get)
    }
}

/// An outgoing request before it reaches a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    /// Header name/value pairs in the order they were added.
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a GET request for the given URL with no headers.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            headers: Vec::new(),
        }
    }

    /// Adds a header to the request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Stable cache key derived from method, URL, and headers only.
    ///
    /// Header order and name casing are normalized so two requests that
    /// differ only cosmetically share a cache entry. Body and credentials
    /// are deliberately excluded.
    pub fn fingerprint(&self) -> String {
        let mut headers: Vec<String> = self
            .headers
            .iter()
            .map(|(name, value)| format!("{}:{}", name.to_ascii_lowercase(), value))
            .collect();
        headers.sort();

        format!("{} {}|{}", self.method.as_str(), self.url, headers.join("|"))
    }
}

/// A completed response: status plus the raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx success range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes HTTP requests.
pub trait HttpTransport {
    /// Issues the request and resolves with the response status and body.
    ///
    /// Resolving is not the same as succeeding: non-2xx statuses come back
    /// as `Ok` responses here and are turned into errors by the client.
    fn execute(&self, request: &HttpRequest)
        -> impl Future<Output = Result<HttpResponse, ApiError>>;
}

/// Browser transport backed by the `fetch` API.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[cfg(target_arch = "wasm32")]
impl HttpTransport for FetchTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        use wasm_bindgen::{JsCast, JsValue};
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestInit, Response};

        fn js_error(value: JsValue) -> ApiError {
            let message = value
                .as_string()
                .or_else(|| {
                    value
                        .dyn_into::<js_sys::Error>()
                        .ok()
                        .map(|error| String::from(error.message()))
                })
                .unwrap_or_else(|| "unknown JS error".to_string());
            ApiError::Transport(message)
        }

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());

        let js_request =
            Request::new_with_str_and_init(&request.url, &opts).map_err(js_error)?;
        for (name, value) in &request.headers {
            js_request.headers().set(name, value).map_err(js_error)?;
        }

        let window = web_sys::window()
            .ok_or_else(|| ApiError::Transport("no window".to_string()))?;
        let response_value = JsFuture::from(window.fetch_with_request(&js_request))
            .await
            .map_err(js_error)?;
        let response: Response = response_value
            .dyn_into()
            .map_err(|_| ApiError::Transport("fetch did not return a Response".to_string()))?;

        let status = response.status();
        let text_promise = response.text().map_err(js_error)?;
        let text_value = JsFuture::from(text_promise).await.map_err(js_error)?;
        let body = text_value.as_string().unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
