//! REST API client for communicating with the DraftForge server.
//!
//! Every call issues exactly one request through the injected [`Transport`]
//! to `{base_path}{path}` with a JSON content type and, when the attached
//! [`AuthStore`] holds a token, a bearer `Authorization` header.
//!
//! HEADER PRECEDENCE
//! =================
//! `Content-Type` is set first and caller headers are merged over it, so a
//! caller may replace it. `Authorization` is applied after the merge and
//! cannot be replaced while a token is present. The asymmetry is kept as-is
//! until the intended contract is settled.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures propagate untouched. Any non-2xx status becomes
//! [`ApiError::Request`] carrying only `error.message` from the body (or
//! [`FALLBACK_ERROR_MESSAGE`]); the status code and `error.code`/`details`
//! are not carried past this layer. A body that is not valid JSON counts as
//! `{}`. No retries, timeouts, or cancellation.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[path = "api_routes.rs"]
mod api_routes;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::transport::{Headers, HttpRequest, Method, Transport, TransportError};
use super::types::ApiResponse;
use crate::config::ClientConfig;
use crate::state::auth::AuthStore;

pub const FALLBACK_ERROR_MESSAGE: &str = "Request failed";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Non-2xx response. Displays as the bare server message.
    #[error("{message}")]
    Request { message: String },
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Per-call request options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Headers,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// JSON API client over a pluggable transport.
#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    config: ClientConfig,
    transport: T,
    auth: Option<AuthStore>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport, auth: None }
    }

    /// Read bearer credentials from `store` on every request.
    #[must_use]
    pub fn with_auth(mut self, store: AuthStore) -> Self {
        self.auth = Some(store);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth(&self) -> Option<&AuthStore> {
        self.auth.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue one request and return the parsed body unchanged on 2xx.
    ///
    /// # Errors
    ///
    /// [`ApiError::Transport`] when the exchange fails, [`ApiError::Request`]
    /// for any non-2xx status.
    pub async fn request_raw(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let token = self.auth.as_ref().map(AuthStore::access_token).unwrap_or_default();
        let method = options.method;
        let request = HttpRequest {
            method,
            url: self.config.url(path),
            headers: build_headers(&options.headers, &token),
            body: options.body,
        };

        log::debug!("api request: {} {path}", method.as_str());
        let resp = self.transport.send(request).await?;
        let body = parse_body(&resp.body);
        if !resp.is_success() {
            let message = error_message(&body);
            log::warn!("api request failed: {} {path} status={} message={message}", method.as_str(), resp.status);
            return Err(ApiError::Request { message });
        }
        Ok(body)
    }

    /// Issue one request and decode the success envelope into `R`.
    ///
    /// # Errors
    ///
    /// As [`Self::request_raw`], plus [`ApiError::Decode`] when a 2xx body
    /// does not fit `ApiResponse<R>`.
    pub async fn request<R: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse<R>, ApiError> {
        let body = self.request_raw(path, options).await?;
        serde_json::from_value(body).map_err(ApiError::Decode)
    }

    /// `GET {base}{path}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<R>, ApiError> {
        self.request(path, RequestOptions::default()).await
    }

    /// `GET {base}{path}` with caller headers. Any method or body in
    /// `options` is overridden.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get_with<R: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse<R>, ApiError> {
        let options = RequestOptions { method: Method::Get, body: None, ..options };
        self.request(path, options).await
    }

    /// `POST {base}{path}` with `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// [`ApiError::Encode`] before anything is sent if `body` cannot be
    /// serialized; otherwise see [`Self::request`].
    pub async fn post<R, B>(&self, path: &str, body: &B) -> Result<ApiResponse<R>, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_string(body).map_err(ApiError::Encode)?;
        let options = RequestOptions { method: Method::Post, body: Some(body), ..RequestOptions::default() };
        self.request(path, options).await
    }
}

fn build_headers(caller: &Headers, token: &str) -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type", "application/json");
    for (name, value) in caller.iter() {
        headers.insert(name, value);
    }
    if !token.is_empty() {
        headers.insert("Authorization", format!("Bearer {token}"));
    }
    headers
}

fn parse_body(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::Object(Map::new()))
}

fn error_message(body: &Value) -> String {
    body.get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(FALLBACK_ERROR_MESSAGE)
        .to_owned()
}
