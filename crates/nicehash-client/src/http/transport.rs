/*
[INPUT]:  Request spec (method, URL, headers) and optional body
[OUTPUT]: JSON-decoded response, or transport/decode error
[POS]:    HTTP layer - single-attempt request dispatch
[UPDATE]: When changing body rules, decoding or client options
*/

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::http::{NicehashError, Result};

/// One outgoing request
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

impl RequestSpec {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Resolve `endpoint` under the path of `base_url` and append `query`.
///
/// The endpoint is appended to the base path, so a gateway prefix such as
/// `http://gw/prefix` is kept. A query embedded in the endpoint is kept and
/// `query` follows it after `&`. The result is normalized the way it goes on
/// the wire: spaces percent-encoded, dot-segments removed, no bare `?`.
pub fn endpoint_url(base_url: &Url, endpoint: &str, query: Option<&str>) -> Result<Url> {
    let mut base = base_url.clone();
    base.set_query(None);
    base.set_fragment(None);
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }

    let mut url = base.join(endpoint.trim_start_matches('/'))?;
    let embedded = url.query().filter(|existing| !existing.is_empty());
    let extra = query.filter(|query| !query.is_empty());
    let merged = match (embedded, extra) {
        (Some(existing), Some(query)) => Some(format!("{existing}&{query}")),
        (Some(existing), None) => Some(existing.to_string()),
        (None, Some(query)) => Some(query.to_string()),
        (None, None) => None,
    };
    url.set_query(merged.as_deref());
    Ok(url)
}

/// Performs exactly one HTTP request per call; no retries
#[derive(Debug, Clone)]
pub struct Transport {
    http_client: Client,
}

impl Transport {
    /// Build a transport; `timeout` of `None` leaves requests unbounded
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
        })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }

    /// Send the request and decode the body as untyped JSON
    pub async fn send(&self, spec: RequestSpec, body: Option<&str>) -> Result<serde_json::Value> {
        self.send_json(spec, body).await
    }

    /// Send the request and decode the body into `T`.
    ///
    /// The body is written only for POST requests with a non-empty payload.
    /// The HTTP status does not decide success: the server reports errors as
    /// JSON documents, which are returned like any other value.
    pub async fn send_json<T>(&self, spec: RequestSpec, body: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let RequestSpec {
            method,
            url,
            mut headers,
        } = spec;

        let payload = body.filter(|body| method == Method::POST && !body.is_empty());
        if payload.is_some() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let mut builder = self
            .http_client
            .request(method.clone(), url.clone())
            .headers(headers);
        if let Some(payload) = payload {
            builder = builder.body(payload.to_string());
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            debug!(%method, %url, %status, bytes = text.len(), "response received");
        } else {
            warn!(%method, %url, %status, "non-success status");
        }

        serde_json::from_str(&text).map_err(|source| {
            warn!(
                %method,
                %url,
                %status,
                body = %text,
                error = %source,
                "failed to decode response body"
            );
            NicehashError::Decode { source, body: text }
        })
    }
}
