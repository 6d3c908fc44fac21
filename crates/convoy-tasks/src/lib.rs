//! Task model for the convoy dispatch pipeline.
//!
//! A [`Signature`] describes one unit of deferred work: its name, generated
//! UUID, positional arguments and the [`Headers`] the broker carries along
//! with it. Signatures compose into a [`Chain`] (sequential), a [`Group`]
//! (concurrent fan-out) or a [`Chord`] (a group with a fan-in callback).
//!
//! This crate owns only the shapes. How tasks are transported and executed
//! belongs to the broker integration; how they are traced belongs to
//! `convoy-tracing`, which reads these shapes and writes propagation keys
//! into their headers.

pub mod composition;
pub mod error;
pub mod headers;
pub mod signature;

pub use composition::{Chain, Chord, Group};
pub use error::TaskError;
pub use headers::Headers;
pub use signature::Signature;
