/*! The task and resource model

Tasks are periodic, statically pinned to one processor, and scheduled
by fixed base priority. Each task accesses some set of shared
resources a fixed number of times per period; each resource has a
critical-section cost that is charged per access, regardless of
which task accesses it.

The central type is [TaskSystem], which validates a collection of
[Task]s and [Resource]s once and then answers the lookup queries the
analysis needs (tasks on a processor, locally higher- and lower-priority
peers, etc.). A validated system is immutable. */

use derive_more::{Display, From, Into};
use thiserror::Error;

use crate::time::Duration;

mod resource;
mod system;
mod task;

pub use resource::Resource;
pub use system::TaskSystem;
pub use task::{Request, Task};

/// Position of a task within its [TaskSystem], in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display)]
pub struct TaskId(usize);

/// Identifier of a shared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display)]
pub struct ResourceId(u32);

/// Identifier of a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display)]
pub struct ProcessorId(u32);

/// A scheduling priority. Numerically larger values are more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display)]
pub struct Priority(u32);

impl Priority {
    pub const fn new(level: u32) -> Self {
        Priority(level)
    }

    /// The priority level immediately below `self`, saturating at zero.
    pub fn just_below(self) -> Priority {
        Priority(self.0.saturating_sub(1))
    }
}

/// Reasons why a set of tasks and resources cannot be analyzed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// A task requests a resource that is not declared.
    #[error("task '{task}' requests unknown resource {resource}")]
    UnknownResource { task: String, resource: ResourceId },
    /// A request key does not name a resource id.
    #[error("task '{task}' requests '{key}', which is not a resource id")]
    InvalidResourceKey { task: String, key: String },
    /// A task requests the same resource twice.
    #[error("task '{task}' lists resource {resource} more than once")]
    DuplicateRequest { task: String, resource: ResourceId },
    /// Periods must be finite and strictly positive.
    #[error("task '{task}' has invalid period {period}")]
    InvalidPeriod { task: String, period: Duration },
    /// Deadlines must be finite and strictly positive.
    #[error("task '{task}' has invalid deadline {deadline}")]
    InvalidDeadline { task: String, deadline: Duration },
    /// Execution times must be finite and non-negative.
    #[error("task '{task}' has invalid execution time {wcet}")]
    InvalidExecutionTime { task: String, wcet: Duration },
    /// Base priorities are non-negative integers.
    #[error("task '{task}' has invalid priority {priority}")]
    InvalidPriority { task: String, priority: i64 },
    /// Critical-section costs must be finite and non-negative.
    #[error("resource {resource} has invalid critical-section cost {cost}")]
    InvalidCost { resource: ResourceId, cost: Duration },
    /// Task names label the output table and must be unique.
    #[error("task name '{task}' is used more than once")]
    DuplicateTask { task: String },
    /// Resource ids must be unique.
    #[error("resource {resource} is declared more than once")]
    DuplicateResource { resource: ResourceId },
}
