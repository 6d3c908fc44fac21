//! Task signatures.

use crate::error::TaskError;
use crate::headers::Headers;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Descriptor of a single task invocation.
///
/// A signature is everything the broker needs to deliver one unit of work:
/// the registered task name, a unique id, routing information, arguments and
/// headers. Group membership and the chord callback are filled in by
/// [`Group`](crate::Group) and [`Chord`](crate::Chord) when the signature
/// becomes part of a composition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Unique id of this invocation, `task_<uuid-v4>`.
    pub uuid: String,
    /// Name the task was registered under.
    pub name: String,
    /// Broker routing key; empty means the broker's default queue.
    #[serde(default)]
    pub routing_key: String,
    /// Positional arguments, already JSON-encoded.
    #[serde(default)]
    pub args: Vec<Value>,
    /// Metadata carried with the task, including trace propagation keys.
    #[serde(default)]
    pub headers: Headers,
    /// UUID of the group this signature belongs to, if any.
    #[serde(default)]
    pub group_uuid: Option<String>,
    /// Number of tasks in the owning group.
    #[serde(default)]
    pub group_task_count: usize,
    /// How many times delivery has been retried so far.
    #[serde(default)]
    pub retry_count: u32,
    /// An immutable signature does not receive the previous task's result
    /// when it runs inside a chain.
    #[serde(default)]
    pub immutable: bool,
    /// Callback to run once the owning group completes (fan-in edge).
    #[serde(default)]
    pub chord_callback: Option<Box<Signature>>,
}

impl Signature {
    /// Create a signature for the task registered as `name`, with a freshly
    /// generated UUID and otherwise empty fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: format!("task_{}", Uuid::new_v4()),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a positional argument, encoding it to JSON.
    pub fn arg<T: Serialize>(mut self, value: T) -> Result<Self, TaskError> {
        self.args.push(serde_json::to_value(value)?);
        Ok(self)
    }

    /// Set the broker routing key.
    pub fn with_routing_key(mut self, routing_key: impl Into<String>) -> Self {
        self.routing_key = routing_key.into();
        self
    }

    /// Set a header entry.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Mark the signature immutable (see [`Signature::immutable`]).
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }
}
