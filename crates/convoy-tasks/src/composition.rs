//! Task compositions: chains, groups and chords.
//!
//! Compositions only describe shape. Scheduling the members, collecting
//! results and firing the chord callback are broker responsibilities.

use crate::error::TaskError;
use crate::signature::Signature;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered sequence of signatures executed one after another, each
/// receiving the previous task's result unless marked immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub tasks: Vec<Signature>,
}

impl Chain {
    /// Build a chain from the given signatures, in execution order.
    pub fn new(tasks: Vec<Signature>) -> Result<Self, TaskError> {
        if tasks.is_empty() {
            return Err(TaskError::EmptyChain);
        }
        Ok(Self { tasks })
    }
}

/// An unordered set of signatures executed concurrently under a shared group
/// UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub group_uuid: String,
    pub tasks: Vec<Signature>,
}

impl Group {
    /// Build a group, stamping every member with the generated group UUID
    /// and the member count.
    pub fn new(tasks: Vec<Signature>) -> Result<Self, TaskError> {
        if tasks.is_empty() {
            return Err(TaskError::EmptyGroup);
        }

        let group_uuid = format!("group_{}", Uuid::new_v4());
        let group_task_count = tasks.len();

        let mut group = Self { group_uuid, tasks };
        for signature in &mut group.tasks {
            signature.group_uuid = Some(group.group_uuid.clone());
            signature.group_task_count = group_task_count;
        }
        Ok(group)
    }

    /// Member task UUIDs, in the order the tasks were given.
    pub fn task_uuids(&self) -> Vec<String> {
        self.tasks.iter().map(|s| s.uuid.clone()).collect()
    }
}

/// A group plus a callback signature that runs once every member has
/// completed (fan-in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub group: Group,
    pub callback: Signature,
}

impl Chord {
    /// Attach `callback` to `group`, recording the callback on every member
    /// so workers know where results converge.
    pub fn new(group: Group, callback: Signature) -> Self {
        let mut chord = Self { group, callback };
        for signature in &mut chord.group.tasks {
            signature.chord_callback = Some(Box::new(chord.callback.clone()));
        }
        chord
    }
}
