//! Authenticated HTTP client and the relationship command helper.
//!
//! # Design
//! `AuthenticatedClient` is the one place that knows how identity travels:
//! reads get `Content-Type` plus `userId`, commands get `userId` alone. Each
//! operation is split into a `build_*` step that produces an `HttpRequest`
//! and an interpretation step over the `HttpResponse`, with the injected
//! `Transport` in between. Failures are logged once here and returned
//! unchanged.

use serde_json::Value;
use tracing::error;

use crate::error::ApiError;
use crate::http::{
    join_url, merge_headers, with_query, HttpMethod, HttpRequest, HttpResponse, RequestConfig,
    Transport,
};
use crate::session::SessionProvider;

pub const USER_ID_HEADER: &str = "userId";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Issues requests on behalf of the current session against one base URL.
pub struct AuthenticatedClient<T, P> {
    base_url: String,
    transport: T,
    session: P,
}

impl<T: Transport, P: SessionProvider> AuthenticatedClient<T, P> {
    pub fn new(base_url: &str, transport: T, session: P) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URL for a path relative to the base URL.
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn session_id(&self) -> Option<String> {
        self.session.current().map(|user| user.id)
    }

    /// A GET carrying the JSON content type and the session id, with the
    /// caller's headers layered last.
    pub fn build_get(&self, url: &str, config: &RequestConfig) -> Result<HttpRequest, ApiError> {
        let mut defaults = vec![(CONTENT_TYPE_HEADER.to_string(), "application/json".to_string())];
        if let Some(id) = self.session_id() {
            defaults.push((USER_ID_HEADER.to_string(), id));
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: with_query(url.to_string(), &config.params)?,
            headers: merge_headers(defaults, &config.headers),
            body: None,
        })
    }

    /// A bodiless command carrying only the session id.
    ///
    /// Signed out, the header is sent empty and the backend decides.
    pub fn build_command(&self, method: HttpMethod, url: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: url.to_string(),
            headers: vec![(USER_ID_HEADER.to_string(), self.session_id().unwrap_or_default())],
            body: None,
        }
    }

    /// GET `url` and return the decoded payload.
    pub fn get(&self, url: &str, config: &RequestConfig) -> Result<Value, ApiError> {
        self.fetch(&self.build_get(url, config)?)
    }

    /// Fire a command. `Some(payload)` on 200, `None` on any other 2xx.
    pub fn command(&self, method: HttpMethod, url: &str) -> Result<Option<Value>, ApiError> {
        self.dispatch(&self.build_command(method, url))
    }

    /// Send a built read and return its payload.
    pub fn fetch(&self, request: &HttpRequest) -> Result<Value, ApiError> {
        let response = self.send(request)?;
        Ok(payload(response))
    }

    /// Send a built command. `Some(payload)` on 200, `None` on any other 2xx.
    pub fn dispatch(&self, request: &HttpRequest) -> Result<Option<Value>, ApiError> {
        let response = self.send(request)?;
        if response.status == 200 {
            Ok(Some(payload(response)))
        } else {
            Ok(None)
        }
    }

    /// Execute and reject non-2xx; every failure is logged exactly once.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = self
            .transport
            .execute(request)
            .and_then(check_status);
        if let Err(e) = &result {
            error!(method = request.method.as_str(), url = %request.url, error = %e, "request failed");
        }
        result
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    if response.status == 404 {
        return Err(ApiError::NotFound {
            body: response.body,
        });
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body,
    })
}

/// The body as JSON: empty is `Null`, anything unparseable is kept as text.
fn payload(response: HttpResponse) -> Value {
    if response.body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&response.body).unwrap_or(Value::String(response.body))
}
