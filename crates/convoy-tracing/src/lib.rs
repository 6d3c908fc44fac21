//! Distributed-tracing bridge for the convoy task pipeline.
//!
//! The broker carries nothing but a flat header map with each task, so trace
//! context has to cross that boundary as plain string entries. This crate
//! owns the crossing in both directions:
//!
//! - before dispatch, [`TaskTracer::headers_with_context`] stamps the active
//!   context (W3C `traceparent`/`tracestate` plus `baggage`) into a
//!   signature's headers;
//! - on delivery, [`TaskTracer::start_span_from_headers`] rebuilds the
//!   context and opens a span for the received task, and
//!   [`TaskTracer::construct_context_from_headers`] rebuilds it without
//!   opening one;
//! - the `annotate_span_with_*_info` methods tag the active span with the
//!   shape of what is being dispatched (bare signature, chain, group or
//!   chord) and stamp every member signature with the same parent context.
//!
//! Nothing here can fail dispatch: malformed context decodes to a root
//! context, non-string header values are invisible to propagation, and
//! annotating a context with no active span is a no-op.
//!
//! # Example
//!
//! ```rust,ignore
//! use convoy_tasks::{Group, Signature};
//! use convoy_tracing::TaskTracer;
//!
//! let tracer = TaskTracer::new();
//!
//! // Producer side: open a span for the send and stamp the members.
//! let cx = tracer.start_span_from_headers(&incoming.headers, "send group");
//! let mut group = Group::new(vec![Signature::new("resize"), Signature::new("upload")])?;
//! tracer.annotate_span_with_group_info(&cx, &mut group, 10);
//!
//! // Worker side: every member continues the same trace.
//! let member_cx = tracer.construct_context_from_headers(&group.tasks[0].headers);
//! ```

mod annotate;
mod propagation;

pub use propagation::TaskTracer;
