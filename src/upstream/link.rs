//! Link resolution against the storage API.
//!
//! `POST {ADDRESS}/api/fs/link` with `{"path": ...}` and the bearer token;
//! the answer names a direct file URL plus any headers the file host needs.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::GatewayError;
use crate::observability::metrics;
use crate::signing::Secret;

/// Path of the link-resolution endpoint below the upstream base URL.
pub const LINK_ENDPOINT: &str = "/api/fs/link";

#[derive(Debug, Serialize)]
struct LinkRequest<'a> {
    path: &'a str,
}

#[derive(Debug, Deserialize)]
struct LinkEnvelope {
    #[serde(default)]
    data: Option<LinkData>,
}

#[derive(Debug, Deserialize)]
struct LinkData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    headers: Option<HashMap<String, HeaderValues>>,
}

/// Header values arrive either as a plain string or as a list of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HeaderValues {
    One(String),
    Many(Vec<String>),
}

/// Where to fetch a resolved file from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamLinkDescriptor {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl UpstreamLinkDescriptor {
    /// Headers to attach to the file request.
    pub fn header_map(&self) -> Result<HeaderMap, GatewayError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| GatewayError::Unexpected(format!("invalid upstream header name: {}", e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| GatewayError::Unexpected(format!("invalid upstream header value: {}", e)))?;
            map.append(name, value);
        }
        Ok(map)
    }
}

/// Decode a link API body. `Ok(None)` means the upstream resolved no URL.
pub fn parse_link_body(body: &[u8]) -> Result<Option<UpstreamLinkDescriptor>, serde_json::Error> {
    let envelope: Option<LinkEnvelope> = serde_json::from_slice(body)?;

    let Some(data) = envelope.and_then(|e| e.data) else {
        return Ok(None);
    };
    let Some(url) = data.url.filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    let mut headers = Vec::new();
    for (name, values) in data.headers.unwrap_or_default() {
        match values {
            HeaderValues::One(value) => headers.push((name, value)),
            HeaderValues::Many(values) => {
                headers.extend(values.into_iter().map(|value| (name.clone(), value)))
            }
        }
    }
    headers.sort();

    Ok(Some(UpstreamLinkDescriptor { url, headers }))
}

/// Client for the link-resolution endpoint.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    client: reqwest::Client,
    endpoint: Url,
    token: Secret,
    timeout: Duration,
}

impl LinkResolver {
    /// `address` is the upstream base URL; a trailing slash is tolerated.
    pub fn new(
        client: reqwest::Client,
        address: &str,
        token: Secret,
        timeout: Duration,
    ) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(&format!(
            "{}{}",
            address.trim().trim_end_matches('/'),
            LINK_ENDPOINT
        ))?;

        Ok(Self {
            client,
            endpoint,
            token,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Resolve `path` to a direct download descriptor.
    pub async fn resolve(&self, path: &str) -> Result<UpstreamLinkDescriptor, GatewayError> {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token.expose_str()))
            .map_err(|_| GatewayError::Unexpected("upstream token is not a valid header value".into()))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, bearer)
            .json(&LinkRequest { path })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                metrics::record_upstream_call("link", "error");
                GatewayError::Unexpected(format!("link request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            metrics::record_upstream_call("link", "rejected");
            tracing::warn!(status = %status, path = %path, "Link API returned an error status");
            return Err(GatewayError::UpstreamResolutionFailed { status });
        }

        let body = response.bytes().await.map_err(|e| {
            metrics::record_upstream_call("link", "error");
            GatewayError::Unexpected(format!("reading link response failed: {}", e))
        })?;

        match parse_link_body(&body) {
            Ok(Some(link)) => {
                metrics::record_upstream_call("link", "ok");
                Ok(link)
            }
            Ok(None) => {
                metrics::record_upstream_call("link", "not_found");
                Err(GatewayError::ResourceNotFound)
            }
            Err(e) => {
                metrics::record_upstream_call("link", "error");
                Err(GatewayError::Unexpected(format!("invalid link response: {}", e)))
            }
        }
    }
}
