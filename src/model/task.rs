use super::{Priority, ProcessorId, ResourceId};
use crate::time::Duration;

/// A task's per-period demand for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub resource: ResourceId,
    /// Number of accesses per period; always non-zero.
    pub count: u32,
}

/// A periodic task pinned to a single processor.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique label; used as the task's name in the output table.
    pub name: String,
    /// The processor the task is bound to for its lifetime.
    pub cpu: ProcessorId,
    pub period: Duration,
    /// The task's relative deadline.
    pub deadline: Duration,
    /// The task's WCET, excluding critical sections.
    pub wcet: Duration,
    /// The task's base priority.
    pub priority: Priority,
    /// Resource requests in input order.
    pub requests: Vec<Request>,
    /// Opaque number carried into the output table.
    pub pid_hint: i64,
}

impl Task {
    /// Create a task without resource requests.
    pub fn new(
        name: impl Into<String>,
        cpu: ProcessorId,
        period: Duration,
        deadline: Duration,
        wcet: Duration,
        priority: Priority,
    ) -> Self {
        Task {
            name: name.into(),
            cpu,
            period,
            deadline,
            wcet,
            priority,
            requests: Vec::new(),
            pid_hint: 0,
        }
    }

    /// Add a request for `count` accesses to `resource` per period.
    /// A count of zero means "no access" and is dropped.
    pub fn with_request(mut self, resource: ResourceId, count: u32) -> Self {
        if count > 0 {
            self.requests.push(Request { resource, count });
        }
        self
    }

    pub fn with_pid_hint(mut self, pid_hint: i64) -> Self {
        self.pid_hint = pid_hint;
        self
    }

    /// The number of accesses to `resource` per period (zero if none).
    pub fn accesses(&self, resource: ResourceId) -> u32 {
        self.requests
            .iter()
            .find(|req| req.resource == resource)
            .map_or(0, |req| req.count)
    }

    /// Does the task access `resource` at all?
    pub fn uses(&self, resource: ResourceId) -> bool {
        self.accesses(resource) > 0
    }

    /// The resources the task accesses, in request order.
    pub fn resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.requests.iter().map(|req| req.resource)
    }
}
