use std::collections::HashSet;

use itertools::Itertools;
use log::warn;

use super::{ModelError, Priority, ProcessorId, Resource, ResourceId, Task, TaskId};
use crate::time::Duration;

/// A validated, immutable collection of processors, tasks, and resources.
///
/// All orderings exposed by this type are derived from the input order,
/// never from hashing, so that every query is deterministic.
#[derive(Debug, Clone)]
pub struct TaskSystem {
    processors: Vec<ProcessorId>,
    tasks: Vec<Task>,
    resources: Vec<Resource>,
}

impl TaskSystem {
    /// Validate the given model.
    ///
    /// Processors are analyzed in the order in which tasks first
    /// reference them. Declared processors that no task is bound to are
    /// kept at the end of that order; they contribute nothing to any
    /// bound. Repeated processor ids are ignored.
    pub fn new(
        processors: Vec<ProcessorId>,
        tasks: Vec<Task>,
        resources: Vec<Resource>,
    ) -> Result<Self, ModelError> {
        let mut resource_ids = HashSet::new();
        for res in &resources {
            if !resource_ids.insert(res.id) {
                return Err(ModelError::DuplicateResource { resource: res.id });
            }
            if !res.cost.is_non_negative() {
                return Err(ModelError::InvalidCost {
                    resource: res.id,
                    cost: res.cost,
                });
            }
        }

        let mut names = HashSet::new();
        for task in &tasks {
            if !names.insert(task.name.as_str()) {
                return Err(ModelError::DuplicateTask {
                    task: task.name.clone(),
                });
            }
            validate_task(task, &resource_ids)?;
        }

        let declared: Vec<ProcessorId> = processors.into_iter().unique().collect();
        let used: Vec<ProcessorId> = tasks.iter().map(|t| t.cpu).unique().collect();
        let undeclared = used.iter().filter(|cpu| !declared.contains(cpu)).join(", ");
        if !declared.is_empty() && !undeclared.is_empty() {
            warn!("processors {} are used by tasks but not declared", undeclared);
        }
        let idle: Vec<ProcessorId> = declared
            .into_iter()
            .filter(|cpu| !used.contains(cpu))
            .collect();

        Ok(TaskSystem {
            processors: used.into_iter().chain(idle).collect(),
            tasks,
            resources,
        })
    }

    /// All processors, in analysis order.
    pub fn processors(&self) -> &[ProcessorId] {
        &self.processors
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[usize::from(id)]
    }

    /// Look up a task by name.
    pub fn task_named(&self, name: &str) -> Option<TaskId> {
        self.tasks
            .iter()
            .position(|t| t.name == name)
            .map(TaskId::from)
    }

    /// All task ids, in input order.
    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> {
        (0..self.tasks.len()).map(TaskId::from)
    }

    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// The critical-section cost of `resource`.
    ///
    /// Every resource a validated task requests is declared, so the
    /// zero fallback never applies to requested resources.
    pub fn critical_section(&self, resource: ResourceId) -> Duration {
        self.resource(resource)
            .map_or(Duration::zero(), |r| r.cost)
    }

    /// The tasks bound to `cpu`, in input order.
    pub fn tasks_on(&self, cpu: ProcessorId) -> impl Iterator<Item = TaskId> + '_ {
        self.task_ids().filter(move |id| self.task(*id).cpu == cpu)
    }

    /// The tasks bound to `cpu` in order of decreasing base priority.
    /// Tasks of equal priority retain their input order.
    pub fn by_decreasing_priority(&self, cpu: ProcessorId) -> Vec<TaskId> {
        self.tasks_on(cpu)
            .sorted_by(|a, b| self.task(*b).priority.cmp(&self.task(*a).priority))
            .collect()
    }

    /// Tasks on the same processor as `id` with strictly higher base priority.
    pub fn local_higher_priority(&self, id: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        let task = self.task(id);
        self.tasks_on(task.cpu)
            .filter(move |other| self.task(*other).priority > task.priority)
    }

    /// Tasks on the same processor as `id` with strictly lower base priority.
    pub fn local_lower_priority(&self, id: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        let task = self.task(id);
        self.tasks_on(task.cpu)
            .filter(move |other| self.task(*other).priority < task.priority)
    }

    /// Processors other than the one `id` is bound to, in analysis order.
    pub fn remote_processors(&self, id: TaskId) -> impl Iterator<Item = ProcessorId> + '_ {
        let own = self.task(id).cpu;
        self.processors.iter().copied().filter(move |cpu| *cpu != own)
    }

    /// The highest base priority of any task, if there are any tasks.
    pub fn highest_base_priority(&self) -> Option<Priority> {
        self.tasks.iter().map(|t| t.priority).max()
    }
}

fn validate_task(task: &Task, resource_ids: &HashSet<ResourceId>) -> Result<(), ModelError> {
    if !task.period.is_positive() {
        return Err(ModelError::InvalidPeriod {
            task: task.name.clone(),
            period: task.period,
        });
    }
    if !task.deadline.is_positive() {
        return Err(ModelError::InvalidDeadline {
            task: task.name.clone(),
            deadline: task.deadline,
        });
    }
    if !task.wcet.is_non_negative() {
        return Err(ModelError::InvalidExecutionTime {
            task: task.name.clone(),
            wcet: task.wcet,
        });
    }
    let mut seen = HashSet::new();
    for req in &task.requests {
        if !resource_ids.contains(&req.resource) {
            return Err(ModelError::UnknownResource {
                task: task.name.clone(),
                resource: req.resource,
            });
        }
        if !seen.insert(req.resource) {
            return Err(ModelError::DuplicateRequest {
                task: task.name.clone(),
                resource: req.resource,
            });
        }
    }
    Ok(())
}
