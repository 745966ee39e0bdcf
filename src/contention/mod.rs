/*! Contention sets (Γ)

When a task and its locally higher-priority peers spin on a resource,
the lock holder is only delayed by remote tasks that cannot be
preempted by the spinning set, i.e., tasks whose *current* spin
priority for the resource exceeds the highest spin priority among the
locally blocked set.

Contention sets depend on the current spin-priority assignment and
must be rebuilt whenever it changes; this module therefore never
caches them. */

use crate::model::{Priority, ProcessorId, ResourceId, TaskId, TaskSystem};
use crate::spin::SpinPriorityMap;
use crate::time::Rate;

/// The contention set of a task under analysis for one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentionSet {
    threshold: Priority,
    members: Vec<TaskId>,
}

impl ContentionSet {
    /// Determine the contention set of `analyzed` for `resource` under
    /// the spin-priority assignment `priorities`.
    pub fn build<P>(sys: &TaskSystem, analyzed: TaskId, resource: ResourceId, priorities: &P) -> Self
    where
        P: SpinPriorityMap + ?Sized,
    {
        // the locally blocked set: the task itself and its local hp peers
        let threshold = std::iter::once(analyzed)
            .chain(sys.local_higher_priority(analyzed))
            .map(|id| priorities.spin_priority(sys, id, resource))
            .max()
            .unwrap_or_else(|| sys.task(analyzed).priority);

        let members = sys
            .task_ids()
            .filter(|id| sys.task(*id).uses(resource))
            .filter(|id| priorities.spin_priority(sys, *id, resource) > threshold)
            .collect();

        ContentionSet { threshold, members }
    }

    /// The highest spin priority among the locally blocked set.
    pub fn threshold(&self) -> Priority {
        self.threshold
    }

    /// Members of the set, across all processors, in input order.
    pub fn members(&self) -> &[TaskId] {
        &self.members
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.members.contains(&id)
    }

    /// The combined release rate `Σ 1/T_h` of the members bound to `cpu`.
    pub fn release_rate_on(&self, sys: &TaskSystem, cpu: ProcessorId) -> Rate {
        self.members
            .iter()
            .map(|id| sys.task(*id))
            .filter(|t| t.cpu == cpu)
            .map(|t| Rate::once_per(t.period))
            .sum()
    }
}
