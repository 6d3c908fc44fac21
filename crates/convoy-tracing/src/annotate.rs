//! Span annotation for task graph shapes.
//!
//! Each annotator tags the span active on the given context with attributes
//! describing what is about to be dispatched, and stamps the composition's
//! member signatures with that same context so every branch of the task
//! graph continues one trace. With no active span the attribute writes land
//! on a no-op span, so annotating speculatively is always safe.

use convoy_tasks::{Chain, Chord, Group, Signature};
use opentelemetry::trace::TraceContextExt;
use opentelemetry::{Array, Context, KeyValue, StringValue, Value};

use crate::propagation::TaskTracer;

impl TaskTracer {
    /// Tag the active span with the signature's identity: name, UUID, group
    /// membership and chord callback when present. Read-only with respect to
    /// the signature.
    pub fn annotate_span_with_signature_info(&self, cx: &Context, signature: &Signature) {
        let span = cx.span();

        span.set_attribute(KeyValue::new("signature.name", signature.name.clone()));
        span.set_attribute(KeyValue::new("signature.uuid", signature.uuid.clone()));

        if let Some(group_uuid) = &signature.group_uuid {
            span.set_attribute(KeyValue::new("signature.group.uuid", group_uuid.clone()));
        }

        if let Some(callback) = &signature.chord_callback {
            span.set_attribute(KeyValue::new(
                "signature.chord.callback.uuid",
                callback.uuid.clone(),
            ));
            span.set_attribute(KeyValue::new(
                "signature.chord.callback.name",
                callback.name.clone(),
            ));
        }
    }

    /// Tag the active span with the chain length and stamp every member with
    /// the chain's context. Members share the invoking span's context; they
    /// do not derive from each other.
    pub fn annotate_span_with_chain_info(&self, cx: &Context, chain: &mut Chain) {
        let span = cx.span();
        span.set_attribute(KeyValue::new("chain.tasks.length", chain.tasks.len() as i64));

        for signature in &mut chain.tasks {
            let headers = std::mem::take(&mut signature.headers);
            signature.headers = self.headers_with_context(Some(headers), cx);
        }
    }

    /// Tag the active span with the group's identity, size and fan-out
    /// concurrency, then stamp every member with the group's context.
    pub fn annotate_span_with_group_info(
        &self,
        cx: &Context,
        group: &mut Group,
        send_concurrency: usize,
    ) {
        let span = cx.span();

        span.set_attribute(KeyValue::new("group.uuid", group.group_uuid.clone()));
        span.set_attribute(KeyValue::new("group.tasks.length", group.tasks.len() as i64));
        span.set_attribute(KeyValue::new("group.concurrency", send_concurrency as i64));

        // Member UUIDs as one JSON attribute; a failed encode degrades to a
        // plain string list and is never surfaced to the dispatch path.
        match serde_json::to_string(&group.task_uuids()) {
            Ok(encoded) => span.set_attribute(KeyValue::new("group.tasks", encoded)),
            Err(error) => {
                tracing::debug!(%error, "group.tasks JSON encode failed, using string list");
                let uuids: Vec<StringValue> = group
                    .task_uuids()
                    .into_iter()
                    .map(StringValue::from)
                    .collect();
                span.set_attribute(KeyValue::new("group.tasks", Value::Array(Array::String(uuids))));
            }
        }

        for signature in &mut group.tasks {
            let headers = std::mem::take(&mut signature.headers);
            signature.headers = self.headers_with_context(Some(headers), cx);
        }
    }

    /// Tag the active span with the chord's callback, stamp the callback's
    /// headers, then annotate the embedded group. Callback and group members
    /// all carry the same context as the invoking span — siblings, not a
    /// parent/child chain.
    pub fn annotate_span_with_chord_info(
        &self,
        cx: &Context,
        chord: &mut Chord,
        send_concurrency: usize,
    ) {
        let span = cx.span();
        span.set_attribute(KeyValue::new("chord.callback.uuid", chord.callback.uuid.clone()));

        let headers = std::mem::take(&mut chord.callback.headers);
        chord.callback.headers = self.headers_with_context(Some(headers), cx);

        self.annotate_span_with_group_info(cx, &mut chord.group, send_concurrency);
    }
}
