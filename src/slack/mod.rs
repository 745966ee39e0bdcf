/*! Per-task slack

A task's slack is the part of its deadline that remains after its own
extended execution time (WCET plus its own critical sections) and the
interference of all local higher-priority tasks. A task is considered
schedulable by the priority assignment if its blocking bound fits
into its slack.

Extended execution times do not depend on spin priorities, so they
are computed once for the entire system. */

use crate::model::{TaskId, TaskSystem};
use crate::time::Duration;

/// The extended execution time `C + Σ N_k·c_k` of `task`.
pub fn extended_execution_time(sys: &TaskSystem, task: TaskId) -> Duration {
    let task = sys.task(task);
    let critical_sections: Duration = task
        .requests
        .iter()
        .map(|req| sys.critical_section(req.resource) * u64::from(req.count))
        .sum();
    task.wcet + critical_sections
}

/// Precomputed extended execution times of every task in a system.
#[derive(Debug, Clone)]
pub struct ExtendedCosts {
    per_task: Vec<Duration>,
}

impl ExtendedCosts {
    pub fn of(sys: &TaskSystem) -> Self {
        ExtendedCosts {
            per_task: sys
                .task_ids()
                .map(|id| extended_execution_time(sys, id))
                .collect(),
        }
    }

    pub fn get(&self, task: TaskId) -> Duration {
        self.per_task[usize::from(task)]
    }
}

/// The slack of `task`:
/// `max(0, D_i − Cbar_i − Σ_{h ∈ lhp(i)} ⌈T_i/T_h⌉·Cbar_h)`.
pub fn slack(sys: &TaskSystem, costs: &ExtendedCosts, task: TaskId) -> Duration {
    let tua = sys.task(task);
    let interference: Duration = sys
        .local_higher_priority(task)
        .map(|hp| costs.get(hp) * sys.task(hp).period.releases_within(tua.period))
        .sum();
    (tua.deadline - costs.get(task) - interference).positive_part()
}

#[cfg(test)]
mod tests;
