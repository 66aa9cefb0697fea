//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The services build `HttpRequest`
//! values and interpret `HttpResponse` values; a `Transport` performs the
//! actual round-trip. Swapping the transport is how tests observe exactly
//! what goes over the wire without a network.
//!
//! Header names compare case-insensitively, as they do on the wire, but are
//! stored with the spelling they were given (`userId`, `Content-Type`).

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value whose name matches `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes an `HttpRequest` and returns whatever the server answered.
///
/// Implementations must hand back non-2xx responses as `Ok`; only failures
/// that produced no response at all become `ApiError::Transport`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Per-call options for `AuthenticatedClient::get`.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, appended in order.
    pub params: Vec<(String, String)>,
    /// Extra headers; these win over the defaults on a name clash.
    pub headers: Vec<(String, String)>,
}

impl RequestConfig {
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Layer `overrides` on top of `base`: an override replaces every base
/// header of the same name, otherwise it is appended.
pub(crate) fn merge_headers(
    base: Vec<(String, String)>,
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = base
        .into_iter()
        .filter(|(k, _)| !overrides.iter().any(|(o, _)| o.eq_ignore_ascii_case(k)))
        .collect();
    merged.extend(overrides.iter().cloned());
    merged
}

/// Join a base URL and a relative path with exactly one `/` between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Append an encoded query string to `url`. Empty `params` leave it untouched.
pub(crate) fn with_query(url: String, params: &[(String, String)]) -> Result<String, ApiError> {
    if params.is_empty() {
        return Ok(url);
    }
    let query = serde_urlencoded::to_string(params)?;
    let sep = if url.contains('?') { '&' } else { '?' };
    Ok(format!("{url}{sep}{query}"))
}
