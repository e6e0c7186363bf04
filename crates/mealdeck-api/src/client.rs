// Food API HTTP client
//
// Wraps `reqwest::Client` with base-URL concatenation, default JSON headers,
// status checking, and JSON body parsing. Typed endpoint helpers live in
// `food.rs` as inherent methods to keep this module focused on transport
// mechanics.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Per-request options merged over the client defaults.
///
/// Method, extra headers, and an optional JSON body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    /// POST with a JSON-encoded body.
    pub fn post(body: &impl Serialize) -> Result<Self, Error> {
        Self::with_body(Method::POST, body)
    }

    /// PUT with a JSON-encoded body.
    pub fn put(body: &impl Serialize) -> Result<Self, Error> {
        Self::with_body(Method::PUT, body)
    }

    fn with_body(method: Method, body: &impl Serialize) -> Result<Self, Error> {
        let body = serde_json::to_value(body).map_err(Error::Encoding)?;
        Ok(Self {
            method,
            headers: HeaderMap::new(),
            body: Some(body),
        })
    }

    /// Add (or replace) a header for this request only.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Async client for the food listing REST API.
///
/// Every request URL is `{base_url}{endpoint}`. An empty base produces a
/// relative URL, which is rejected with [`Error::InvalidUrl`] before any I/O.
pub struct FoodClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl FoodClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Create a client from a base URL and a `TransportConfig`.
    ///
    /// A trailing `/` on the base is dropped so `"https://host/api/"` and
    /// `"https://host/api"` both resolve `/Food` to `https://host/api/Food`.
    pub fn new(base_url: impl Into<String>, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url.into()),
            timeout: Some(transport.timeout),
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url.into()),
            timeout: None,
        }
    }

    /// The configured base URL (possibly empty).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, endpoint: &str) -> Result<Url, Error> {
        let full = format!("{}{endpoint}", self.base_url);
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Perform a request and return the parsed JSON body.
    ///
    /// `Content-Type: application/json` is always sent unless the caller
    /// supplies its own value. Any non-2xx status becomes
    /// [`Error::RequestFailed`]. An empty success body yields `Value::Null`.
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<serde_json::Value, Error> {
        let url = self.url(endpoint)?;
        debug!("{} {url}", options.method);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }

        let mut builder = self.http.request(options.method, url).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body.to_string());
        }

        let resp = builder.send().await.map_err(|e| self.map_send_error(e))?;
        self.handle_response(resp).await
    }

    /// Perform a request and deserialize the body into `T`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, Error> {
        let value = self.request(endpoint, options).await?;
        serde_json::from_value(value.clone()).map_err(|e| {
            let body = value.to_string();
            Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body,
            }
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        match self.timeout {
            Some(timeout) if err.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(err),
        }
    }

    async fn handle_response(&self, resp: reqwest::Response) -> Result<serde_json::Value, Error> {
        let status = resp.status();

        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or_default().to_owned();
            debug!(status = status.as_u16(), %status_text, "request failed");
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                status_text,
            });
        }

        let body = resp.text().await.map_err(|e| self.map_send_error(e))?;
        trace!(len = body.len(), "response body received");

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }
}

fn normalize_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
