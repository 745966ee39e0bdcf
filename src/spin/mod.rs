/*! Spin-priority assignments

A spin-priority assignment maps each (task, resource) pair for which
the task accesses the resource to the priority at which the task
busy-waits for that resource. Pairs without an entry spin at the
task's base priority.

Read access goes through the [SpinPriorityMap] trait so that every
computation that depends on the current assignment takes it as an
explicit argument. The concrete store, [SpinPriorities], keeps its
entries in insertion order, which is also the order of the exported
table. */

use std::collections::HashMap;

use auto_impl::auto_impl;
use log::debug;

use crate::model::{Priority, ResourceId, TaskId, TaskSystem};
use crate::rate::{local_access_rate, processor_access_rate};
use crate::time::Rate;

/// Fallback for the high sentinel of a system without tasks.
pub const DEFAULT_HIGH_PRIORITY: Priority = Priority::new(255);

/// Tolerance when comparing local and remote access rates during
/// initialization.
const RATE_TOLERANCE: f64 = 1e-12;

/// Read-only view of a spin-priority assignment.
#[auto_impl(&, Box, Rc)]
pub trait SpinPriorityMap {
    /// The explicitly assigned spin priority of `task` for `resource`, if any.
    fn assigned(&self, task: TaskId, resource: ResourceId) -> Option<Priority>;

    /// The effective spin priority of `task` for `resource`: the
    /// assigned value, or the task's base priority if there is none.
    fn spin_priority(&self, sys: &TaskSystem, task: TaskId, resource: ResourceId) -> Priority {
        self.assigned(task, resource)
            .unwrap_or_else(|| sys.task(task).priority)
    }
}

impl SpinPriorityMap for HashMap<(TaskId, ResourceId), Priority> {
    fn assigned(&self, task: TaskId, resource: ResourceId) -> Option<Priority> {
        self.get(&(task, resource)).copied()
    }
}

/// One row of a spin-priority assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub task: TaskId,
    pub resource: ResourceId,
    pub priority: Priority,
}

/// An insertion-ordered spin-priority assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpinPriorities {
    entries: Vec<Entry>,
    index: HashMap<(TaskId, ResourceId), usize>,
}

impl SpinPriorities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the initial assignment of `sys`.
    ///
    /// Each task spins on a resource at its base priority if its local
    /// access rate (including its local higher-priority peers) already
    /// dominates the access rate of every remote processor; otherwise it
    /// spins at the shared high sentinel (see [high_sentinel]). Entries
    /// are created in task order, then in request order.
    pub fn initialize(sys: &TaskSystem, back_to_back: bool) -> Self {
        let high = high_sentinel(sys);
        let mut priorities = SpinPriorities::new();
        for id in sys.task_ids() {
            let task = sys.task(id);
            for resource in task.resources() {
                let dominated = local_rate_dominates(sys, id, resource, back_to_back);
                let priority = if dominated { task.priority } else { high };
                debug!(
                    "initial spin priority of {} for resource {}: {}",
                    task.name, resource, priority
                );
                priorities.assign(id, resource, priority);
            }
        }
        priorities
    }

    /// Set the spin priority of `task` for `resource`, returning the
    /// previous value. New entries are appended.
    pub fn assign(&mut self, task: TaskId, resource: ResourceId, priority: Priority) -> Option<Priority> {
        match self.index.get(&(task, resource)) {
            Some(&pos) => {
                let previous = self.entries[pos].priority;
                self.entries[pos].priority = priority;
                Some(previous)
            }
            None => {
                self.index.insert((task, resource), self.entries.len());
                self.entries.push(Entry {
                    task,
                    resource,
                    priority,
                });
                None
            }
        }
    }

    /// Raise the spin priority of `task` for `resource` to at least
    /// `priority`. Returns `true` if the stored value changed.
    pub fn raise(&mut self, task: TaskId, resource: ResourceId, priority: Priority) -> bool {
        match self.assigned(task, resource) {
            Some(current) if current >= priority => false,
            _ => {
                self.assign(task, resource, priority);
                true
            }
        }
    }

    pub fn get(&self, task: TaskId, resource: ResourceId) -> Option<Priority> {
        self.index.get(&(task, resource)).map(|pos| self.entries[*pos].priority)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SpinPriorityMap for SpinPriorities {
    fn assigned(&self, task: TaskId, resource: ResourceId) -> Option<Priority> {
        self.get(task, resource)
    }
}

/// The shared "high" spin priority: the highest base priority of any
/// task in `sys`, or [DEFAULT_HIGH_PRIORITY] if there are no tasks.
pub fn high_sentinel(sys: &TaskSystem) -> Priority {
    sys.highest_base_priority().unwrap_or(DEFAULT_HIGH_PRIORITY)
}

fn local_rate_dominates(sys: &TaskSystem, task: TaskId, resource: ResourceId, back_to_back: bool) -> bool {
    let phi_local = local_access_rate(sys, task, resource) + Rate::from(RATE_TOLERANCE);
    sys.remote_processors(task)
        .all(|cpu| phi_local >= processor_access_rate(sys, task, cpu, resource, back_to_back))
}
