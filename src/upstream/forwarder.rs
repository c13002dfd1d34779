//! File forwarding.
//!
//! # Responsibilities
//! - Resolve the path through the link API
//! - Fetch the direct URL with the upstream-supplied headers
//! - Stream the file back with normalized download and CORS headers
//!
//! # Design Decisions
//! - Single attempt per call; an upstream fault is one downstream fault
//! - The response head is under `fetch_secs`; the body has no total deadline,
//!   only a bound on the silence between chunks (`read_secs`)
//! - Dropping the returned future abandons both outbound calls

use std::io;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::response::Response;
use futures_util::{stream, Stream, StreamExt};

use crate::error::GatewayError;
use crate::http::response::file_response;
use crate::observability::metrics;
use crate::upstream::link::{LinkResolver, UpstreamLinkDescriptor};

/// Resolves and streams files for authorized requests.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    links: LinkResolver,
    fetch_timeout: Duration,
    idle_timeout: Duration,
}

impl Forwarder {
    pub fn new(
        client: reqwest::Client,
        links: LinkResolver,
        fetch_timeout: Duration,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            client,
            links,
            fetch_timeout,
            idle_timeout,
        }
    }

    /// Serve `path`. Only call this once the request has been authorized.
    pub async fn forward(&self, path: &str) -> Result<Response, GatewayError> {
        let link = self.links.resolve(path).await?;
        tracing::debug!(path = %path, headers = link.headers.len(), "Link resolved");

        let upstream = self.fetch(&link).await?;
        let status = upstream.status();
        let headers = upstream.headers().clone();

        let body = idle_bounded(upstream.bytes_stream(), self.idle_timeout);

        Ok(file_response(status, &headers, path, Body::from_stream(body)))
    }

    async fn fetch(&self, link: &UpstreamLinkDescriptor) -> Result<reqwest::Response, GatewayError> {
        let headers = link.header_map()?;

        let request = self.client.get(link.url.as_str()).headers(headers).send();
        let response = match tokio::time::timeout(self.fetch_timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                metrics::record_upstream_call("fetch", "error");
                return Err(GatewayError::Unexpected(format!("file request failed: {}", e)));
            }
            Err(_) => {
                metrics::record_upstream_call("fetch", "timeout");
                return Err(GatewayError::Unexpected(format!(
                    "file host did not answer within {:?}",
                    self.fetch_timeout
                )));
            }
        };

        let status = response.status();
        if !status.is_success() {
            metrics::record_upstream_call("fetch", "rejected");
            return Err(GatewayError::UpstreamFetchFailed { status });
        }

        metrics::record_upstream_call("fetch", "ok");
        Ok(response)
    }
}

/// Relay `body` until it ends, fails, or stays silent for longer than `idle`.
///
/// Any failure ends the stream with an error, which aborts the downstream response.
fn idle_bounded<S>(body: S, idle: Duration) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    stream::unfold(Some(Box::pin(body)), move |state| async move {
        let mut body = state?;
        match tokio::time::timeout(idle, body.next()).await {
            Ok(Some(Ok(chunk))) => Some((Ok(chunk), Some(body))),
            Ok(Some(Err(e))) => {
                tracing::warn!(error = %e, "File stream interrupted");
                metrics::record_upstream_call("stream", "error");
                Some((Err(io::Error::other(e)), None))
            }
            Ok(None) => None,
            Err(_) => {
                tracing::warn!(idle = ?idle, "File host went silent mid-body");
                metrics::record_upstream_call("stream", "timeout");
                Some((
                    Err(io::Error::new(io::ErrorKind::TimedOut, "file host stalled")),
                    None,
                ))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(items: Vec<&'static str>) -> impl Stream<Item = reqwest::Result<Bytes>> + Send {
        stream::iter(items.into_iter().map(|s| Ok(Bytes::from_static(s.as_bytes()))))
    }

    #[tokio::test]
    async fn test_idle_bounded_relays_everything() {
        let relayed: Vec<_> = idle_bounded(chunks(vec!["ab", "cd"]), Duration::from_secs(1))
            .collect()
            .await;
        let bytes: Vec<u8> = relayed
            .into_iter()
            .flat_map(|chunk| chunk.unwrap().to_vec())
            .collect();
        assert_eq!(bytes, b"abcd");
    }

    #[tokio::test]
    async fn test_idle_bounded_ends_stalled_body() {
        let stalled = chunks(vec!["abcd"]).chain(stream::pending::<reqwest::Result<Bytes>>());
        let mut relayed = Box::pin(idle_bounded(stalled, Duration::from_millis(100)));

        assert_eq!(relayed.next().await.unwrap().unwrap().as_ref(), b"abcd");
        let err = relayed.next().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert!(relayed.next().await.is_none());
    }
}
