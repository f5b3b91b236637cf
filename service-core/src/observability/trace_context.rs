//! Trace propagation on calls between services.
//!
//! Outgoing requests carry W3C `traceparent`/`tracestate` for the current
//! span and, when the caller has one, the inbound `x-request-id`, so the
//! gateway and the AI service log under the same identifiers.
//!
//! See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::TraceContextExt;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// W3C headers for the current span.
///
/// Empty when the span has no valid OpenTelemetry context, which is the
/// case whenever no OTLP exporter was installed.
pub fn trace_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    let context = Span::current().context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();
    if !span_context.is_valid() {
        return headers;
    }

    // version-trace_id-span_id-trace_flags
    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    );
    if let Ok(value) = HeaderValue::from_str(&traceparent) {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let trace_state = span_context.trace_state().header();
    if !trace_state.is_empty()
        && let Ok(value) = HeaderValue::from_str(&trace_state)
    {
        headers.insert(TRACESTATE_HEADER, value);
    }

    headers
}

/// A reqwest request that picks up trace headers when sent.
pub struct TracedRequest {
    request: reqwest::RequestBuilder,
    request_id: Option<String>,
}

impl TracedRequest {
    pub fn new(request: reqwest::RequestBuilder) -> Self {
        Self {
            request,
            request_id: None,
        }
    }

    pub fn json<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        Self {
            request: self.request.json(json),
            ..self
        }
    }

    /// Forwards the caller's correlation id, if any.
    pub fn request_id(self, request_id: Option<&str>) -> Self {
        Self {
            request_id: request_id.map(str::to_string),
            ..self
        }
    }

    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        let mut headers = trace_headers();
        if let Some(id) = self.request_id.as_deref()
            && let Ok(value) = HeaderValue::from_str(id)
        {
            headers.insert(REQUEST_ID_HEADER, value);
        }

        self.request.headers(headers).send().await
    }
}

pub trait TracedClientExt {
    fn traced_post(&self, url: &str) -> TracedRequest;
}

impl TracedClientExt for reqwest::Client {
    fn traced_post(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.post(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_trace_headers_outside_an_otel_span() {
        assert!(trace_headers().is_empty());

        let span = tracing::info_span!("plain");
        let _guard = span.enter();
        assert!(trace_headers().is_empty());
    }
}
