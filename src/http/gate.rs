//! Request gate.
//!
//! # Responsibilities
//! - Answer preflights and reject unsupported methods
//! - Verify the token before any upstream I/O
//! - Delegate authorized requests to the forwarder
//!
//! # Design Decisions
//! - Host-agnostic: consumes method, path and token, returns an `http::Response`
//! - Stateless per request; safe to call from any number of tasks at once
//! - Every failure is turned into a response here; nothing propagates to the host

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::http::Method;
use axum::response::{IntoResponse, Response};

use crate::error::GatewayError;
use crate::http::response::preflight;
use crate::observability::metrics;
use crate::signing::Verifier;
use crate::upstream::Forwarder;

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// The three facts the gate needs from a host request.
#[derive(Debug, Clone, Copy)]
pub struct InboundRequest<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    /// Raw `sign` query value, if present.
    pub sign: Option<&'a str>,
}

/// Authorization gate in front of the forwarder.
pub struct Gate {
    verifier: Verifier,
    forwarder: Forwarder,
    clock: Arc<dyn Clock>,
}

impl Gate {
    pub fn new(verifier: Verifier, forwarder: Forwarder) -> Self {
        Self {
            verifier,
            forwarder,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock, e.g. to pin verification time.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Handle one request to completion.
    pub async fn handle(&self, request: InboundRequest<'_>) -> Response {
        let start = Instant::now();

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            has_sign = request.sign.is_some(),
            "Request received"
        );

        let (response, outcome) = match self.dispatch(&request).await {
            Ok(response) => (response, "served"),
            Err(err) => {
                let outcome = err.outcome();
                (err.into_response(), outcome)
            }
        };

        metrics::record_request(
            request.method.as_str(),
            response.status().as_u16(),
            outcome,
            start,
        );
        response
    }

    async fn dispatch(&self, request: &InboundRequest<'_>) -> Result<Response, GatewayError> {
        if request.method == Method::OPTIONS {
            return Ok(preflight());
        }
        if request.method != Method::GET {
            return Err(GatewayError::MethodNotAllowed);
        }

        // Sampled now, not at arrival.
        let now = self.clock.now_unix();
        let token = request.sign.unwrap_or_default();
        if let Err(denial) = self.verifier.check(request.path, token, now) {
            metrics::record_denial(denial.as_str());
            tracing::info!(path = %request.path, reason = %denial, "Token rejected");
            return Err(GatewayError::Forbidden(denial));
        }

        self.forwarder.forward(request.path).await
    }
}
