/*! The spin-priority assignment heuristic

Starting from the initial assignment (see
[SpinPriorities::initialize]), processors are visited in analysis
order and, on each processor, tasks in order of decreasing base
priority. For each task τ_i:

1. The candidate set F* collects every resource for which some local
   lower-priority peer currently spins at or above τ_i's base
   priority.
2. τ_i's slack is computed once.
3. While Ψ(τ_i) exceeds the slack and F* is non-empty, the candidate
   with the largest one-shot blocking time `b̃_k·c_k` is selected
   (first-encountered on ties), every local lower-priority peer that
   accesses it is assigned spin priority `P_i − 1`, and the resource is
   removed from F*.

The processing order matters: each step changes the contention sets
seen by all subsequently analyzed tasks. The heuristic is greedy and
never backtracks; a resource removed from F* is not reconsidered even
if later steps increase Ψ again. The result is therefore an
approximation and tasks may end up infeasible, which is reported in
each task's [TaskReport] rather than hidden. */

use log::{debug, info, warn};
use serde::Deserialize;

use crate::blocking::bound_blocking;
use crate::model::{ProcessorId, ResourceId, TaskId, TaskSystem};
use crate::slack::{slack, ExtendedCosts};
use crate::spin::{SpinPriorities, SpinPriorityMap};
use crate::time::Duration;

/// How a selected candidate resource updates the spin priorities of
/// local lower-priority peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationPolicy {
    /// Spin priorities are set to exactly `P_i − 1`, even if that is
    /// below the current value. A peer spinning at the high sentinel
    /// moves down to just below the task under analysis.
    #[default]
    Overwrite,
    /// Spin priorities move to at least `P_i − 1` and never decrease.
    Raise,
}

/// Tuning knobs of the assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssignmentParams {
    /// Account for one extra back-to-back access per remote task
    /// within each release of the task under analysis.
    pub back_to_back: bool,
    pub elevation: ElevationPolicy,
}

impl Default for AssignmentParams {
    fn default() -> Self {
        AssignmentParams {
            back_to_back: true,
            elevation: ElevationPolicy::default(),
        }
    }
}

/// The outcome of the refinement step of one task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    pub task: TaskId,
    pub cpu: ProcessorId,
    pub slack: Duration,
    /// The blocking bound Ψ when the refinement of this task stopped.
    pub blocking: Duration,
    /// Number of times Ψ was evaluated.
    pub iterations: usize,
    /// The candidate resources selected for elevation, in order.
    pub elevated: Vec<ResourceId>,
    /// Whether the refinement stopped because F* ran empty.
    pub exhausted: bool,
}

impl TaskReport {
    /// Does the final blocking bound fit into the task's slack?
    pub fn is_feasible(&self) -> bool {
        self.blocking <= self.slack
    }
}

/// A complete spin-priority assignment and the per-task outcomes.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub priorities: SpinPriorities,
    /// One report per task, in processing order.
    pub reports: Vec<TaskReport>,
}

impl Assignment {
    pub fn report_for(&self, task: TaskId) -> Option<&TaskReport> {
        self.reports.iter().find(|r| r.task == task)
    }

    /// Reports of tasks whose blocking bound exceeds their slack.
    pub fn infeasible(&self) -> impl Iterator<Item = &TaskReport> {
        self.reports.iter().filter(|r| !r.is_feasible())
    }
}

/// Compute the initial assignment of `sys` and refine it.
pub fn assign(sys: &TaskSystem, params: &AssignmentParams) -> Assignment {
    let mut priorities = SpinPriorities::initialize(sys, params.back_to_back);
    let reports = refine(sys, &mut priorities, params);
    Assignment {
        priorities,
        reports,
    }
}

/// Run one refinement pass over all processors and tasks, updating
/// `priorities` in place.
pub fn refine(
    sys: &TaskSystem,
    priorities: &mut SpinPriorities,
    params: &AssignmentParams,
) -> Vec<TaskReport> {
    let costs = ExtendedCosts::of(sys);
    let mut reports = Vec::with_capacity(sys.tasks().len());
    for &cpu in sys.processors() {
        for task in sys.by_decreasing_priority(cpu) {
            reports.push(refine_task(sys, &costs, priorities, task, params));
        }
    }
    let infeasible = reports.iter().filter(|r| !r.is_feasible()).count();
    info!(
        "refined {} tasks on {} processors ({} entries, {} infeasible)",
        reports.len(),
        sys.processors().len(),
        priorities.len(),
        infeasible
    );
    reports
}

fn refine_task(
    sys: &TaskSystem,
    costs: &ExtendedCosts,
    priorities: &mut SpinPriorities,
    task: TaskId,
    params: &AssignmentParams,
) -> TaskReport {
    let tua = sys.task(task);
    let mut candidates = candidate_resources(sys, &*priorities, task);
    let slack = slack(sys, costs, task);
    let mut elevated = Vec::new();
    let mut iterations = 0;

    let blocking = loop {
        iterations += 1;
        let bound = bound_blocking(sys, task, &*priorities, params.back_to_back);
        if bound.total() <= slack || candidates.is_empty() {
            break bound.total();
        }

        // pick the candidate with the largest one-shot blocking time
        let mut best = 0;
        for (pos, resource) in candidates.iter().enumerate().skip(1) {
            if bound.one_shot_time(*resource) > bound.one_shot_time(candidates[best]) {
                best = pos;
            }
        }
        let resource = candidates.remove(best);
        debug!(
            "{}: Ψ = {} exceeds slack {}; elevating resource {}",
            tua.name,
            bound.total(),
            slack,
            resource
        );
        elevate(sys, priorities, task, resource, params.elevation);
        elevated.push(resource);
    };

    let report = TaskReport {
        task,
        cpu: tua.cpu,
        slack,
        blocking,
        iterations,
        elevated,
        exhausted: candidates.is_empty(),
    };
    if !report.is_feasible() {
        warn!(
            "{}: blocking bound {} exceeds slack {} after {} elevations",
            tua.name,
            report.blocking,
            report.slack,
            report.elevated.len()
        );
    }
    report
}

/// F*: resources for which some local lower-priority peer of `task`
/// spins at or above `task`'s base priority, in discovery order.
fn candidate_resources<P>(sys: &TaskSystem, priorities: &P, task: TaskId) -> Vec<ResourceId>
where
    P: SpinPriorityMap + ?Sized,
{
    let level = sys.task(task).priority;
    let mut candidates = Vec::new();
    for lp in sys.local_lower_priority(task) {
        for resource in sys.task(lp).resources() {
            if priorities.spin_priority(sys, lp, resource) >= level && !candidates.contains(&resource) {
                candidates.push(resource);
            }
        }
    }
    candidates
}

/// Move every local lower-priority peer of `task` that accesses
/// `resource` to spin priority `P_i − 1`.
fn elevate(
    sys: &TaskSystem,
    priorities: &mut SpinPriorities,
    task: TaskId,
    resource: ResourceId,
    policy: ElevationPolicy,
) {
    let target = sys.task(task).priority.just_below();
    for lp in sys.local_lower_priority(task) {
        if !sys.task(lp).uses(resource) {
            continue;
        }
        match policy {
            ElevationPolicy::Raise => {
                priorities.raise(lp, resource, target);
            }
            ElevationPolicy::Overwrite => {
                priorities.assign(lp, resource, target);
            }
        }
    }
}
