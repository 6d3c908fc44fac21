//! Trace context propagation through task headers.
//!
//! Uses the W3C formats: `traceparent`/`tracestate` for trace identity and
//! `baggage` for cross-cutting key/value pairs. Headers hold arbitrary JSON
//! values, so propagation sees them through a string-only carrier view: only
//! string-valued entries are readable, and injection writes string values
//! under the propagators' reserved keys without touching anything else.

use std::borrow::Cow;

use convoy_tasks::Headers;
use opentelemetry::propagation::{
    Extractor, Injector, TextMapCompositePropagator, TextMapPropagator,
};
use opentelemetry::trace::{TraceContextExt, Tracer};
use opentelemetry::{Context, global};
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use serde_json::Value;

/// Default instrumentation scope name for spans started by the bridge.
const TRACER_NAME: &str = "convoy";

/// Read-side carrier view over [`Headers`].
///
/// Only string-valued entries are visible; headers may legitimately hold
/// non-string application data, which extraction skips silently.
struct HeaderExtractor<'a>(&'a Headers);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn keys(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, value)| value.is_string())
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

/// Write-side carrier view over [`Headers`].
///
/// Overwrites the value at the given key and nothing else; keys the
/// propagators do not own are never touched.
struct HeaderInjector<'a>(&'a mut Headers);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        self.0.insert(key, Value::String(value));
    }
}

/// Propagates trace context across the task dispatch boundary.
///
/// Wraps the composite text-map propagator (trace identity + baggage) as an
/// explicit value: construct one at startup and share it wherever tasks are
/// sent or received. Spans are registered through the process-global tracer
/// provider under the `convoy` scope unless overridden with
/// [`with_tracer_name`](Self::with_tracer_name).
///
/// Every operation is infallible. Whatever goes wrong during encoding or
/// decoding degrades to less tracing information, never to an error the
/// dispatch path would have to handle.
pub struct TaskTracer {
    propagator: TextMapCompositePropagator,
    tracer_name: Cow<'static, str>,
}

impl TaskTracer {
    /// Create a bridge propagating W3C trace context and baggage.
    pub fn new() -> Self {
        Self {
            propagator: TextMapCompositePropagator::new(vec![
                Box::new(TraceContextPropagator::new()),
                Box::new(BaggagePropagator::new()),
            ]),
            tracer_name: Cow::Borrowed(TRACER_NAME),
        }
    }

    /// Register spans under a different instrumentation scope name.
    pub fn with_tracer_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.tracer_name = name.into();
        self
    }

    /// Extract the trace context carried by `headers` and start a span named
    /// `operation_name` under it.
    ///
    /// If the headers carry no usable context the span becomes a trace root.
    /// The returned context owns the new span; reach it with
    /// [`Context::span`] and end it there when the operation completes. The
    /// input headers are not modified.
    pub fn start_span_from_headers(
        &self,
        headers: &Headers,
        operation_name: impl Into<Cow<'static, str>>,
    ) -> Context {
        let parent_cx = self.construct_context_from_headers(headers);
        let tracer = global::tracer(self.tracer_name.clone());
        let span = tracer.start_with_context(operation_name.into(), &parent_cx);
        parent_cx.with_span(span)
    }

    /// Rebuild the trace context carried by `headers` without starting a
    /// span.
    ///
    /// Missing or malformed propagation keys yield an empty root context;
    /// extraction is best-effort and has no side effects on the tracing
    /// backend.
    pub fn construct_context_from_headers(&self, headers: &Headers) -> Context {
        self.propagator
            .extract_with_context(&Context::new(), &HeaderExtractor(headers))
    }

    /// Stamp `cx` into `headers` and return them.
    ///
    /// This is the write path used before dispatch. Passing `None` allocates
    /// a fresh header map, so the caller must keep the returned value.
    /// Injection only writes the propagators' reserved keys and is
    /// idempotent: stamping the same context twice leaves identical headers.
    pub fn headers_with_context(&self, headers: Option<Headers>, cx: &Context) -> Headers {
        let mut headers = headers.unwrap_or_default();
        self.propagator
            .inject_context(cx, &mut HeaderInjector(&mut headers));
        headers
    }
}

impl Default for TaskTracer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::baggage::BaggageExt;
    use opentelemetry::trace::{SpanContext, SpanId, TraceFlags, TraceId, TraceState};
    use opentelemetry::KeyValue;
    use serde_json::json;

    const TRACE_ID: &str = "0af7651916cd43dd8448eb211c80319c";
    const SPAN_ID: &str = "b7ad6b7169203331";

    fn remote_context() -> Context {
        let span_context = SpanContext::new(
            TraceId::from_hex(TRACE_ID).expect("trace id"),
            SpanId::from_hex(SPAN_ID).expect("span id"),
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );
        Context::new().with_remote_span_context(span_context)
    }

    #[test]
    fn test_extractor_sees_only_string_values() {
        let mut headers = Headers::new();
        headers.insert("traceparent", "dummy");
        headers.insert("retries", json!(3));
        headers.insert("payload", json!({"k": "v"}));

        let extractor = HeaderExtractor(&headers);
        assert_eq!(extractor.get("traceparent"), Some("dummy"));
        assert_eq!(extractor.get("retries"), None);
        assert_eq!(extractor.get("payload"), None);
        assert_eq!(extractor.keys(), vec!["traceparent"]);
    }

    #[test]
    fn test_round_trip_preserves_trace_identity() {
        let tracer = TaskTracer::new();
        let cx = remote_context();

        let headers = tracer.headers_with_context(None, &cx);
        let restored = tracer.construct_context_from_headers(&headers);

        let restored_cx = restored.span().span_context().clone();
        assert_eq!(restored_cx.trace_id().to_string(), TRACE_ID);
        assert_eq!(restored_cx.span_id().to_string(), SPAN_ID);
        assert!(restored_cx.is_sampled());
        assert!(restored_cx.is_remote());
    }

    #[test]
    fn test_nil_headers_get_allocated_with_propagation_keys_only() {
        let tracer = TaskTracer::new();
        let headers = tracer.headers_with_context(None, &remote_context());

        let expected_traceparent = format!("00-{TRACE_ID}-{SPAN_ID}-01");
        assert_eq!(headers.get_str("traceparent"), Some(expected_traceparent.as_str()));
        for (key, _) in &headers {
            assert!(
                matches!(key.as_str(), "traceparent" | "tracestate" | "baggage"),
                "unexpected injected key: {key}"
            );
        }
    }

    #[test]
    fn test_stamping_is_idempotent() {
        let tracer = TaskTracer::new();
        let cx = remote_context();

        let once = tracer.headers_with_context(None, &cx);
        let twice = tracer.headers_with_context(Some(once.clone()), &cx);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_stamping_preserves_unrelated_entries() {
        let tracer = TaskTracer::new();
        let mut headers = Headers::new();
        headers.insert("origin", "api");
        headers.insert("attempt", json!(2));

        let stamped = tracer.headers_with_context(Some(headers), &remote_context());

        assert_eq!(stamped.get_str("origin"), Some("api"));
        assert_eq!(stamped.get("attempt"), Some(&json!(2)));
        assert!(stamped.get_str("traceparent").is_some());
    }

    #[test]
    fn test_malformed_carrier_decodes_to_root_context() {
        let tracer = TaskTracer::new();
        let mut headers = Headers::new();
        headers.insert("traceparent", "not-a-trace-context");

        let cx = tracer.construct_context_from_headers(&headers);
        assert!(!cx.has_active_span());
        assert!(!cx.span().span_context().is_valid());
    }

    #[test]
    fn test_empty_headers_decode_to_root_context() {
        let tracer = TaskTracer::new();
        let cx = tracer.construct_context_from_headers(&Headers::new());
        assert!(!cx.has_active_span());
    }

    #[test]
    fn test_baggage_travels_with_trace_identity() {
        let tracer = TaskTracer::new();
        let cx = remote_context().with_baggage(vec![KeyValue::new("tenant.id", "acme")]);

        let headers = tracer.headers_with_context(None, &cx);
        assert!(headers.get_str("baggage").is_some());

        let restored = tracer.construct_context_from_headers(&headers);
        let tenant = restored
            .baggage()
            .get("tenant.id")
            .map(|value| value.as_str().into_owned());
        assert_eq!(tenant.as_deref(), Some("acme"));
    }
}
