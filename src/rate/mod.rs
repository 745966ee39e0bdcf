/*! Resource access rates (φ)

The blocking analysis reasons about how frequently each task, and
each processor as a whole, accesses a given resource. An access rate
is simply the number of accesses per period divided by the period.

Per-processor rates are always computed *relative to a task under
analysis*: besides the regular rate of every task on the processor,
the remote processor may issue one additional, back-to-back access
per task within each release of the task under analysis. */

use crate::model::{ProcessorId, ResourceId, Task, TaskId, TaskSystem};
use crate::time::Rate;

/// The rate `N / T` at which `task` accesses `resource`, or zero if
/// it does not access the resource.
pub fn access_rate(task: &Task, resource: ResourceId) -> Rate {
    match task.accesses(resource) {
        0 => Rate::zero(),
        n => Rate::of(n, task.period),
    }
}

/// The aggregate rate at which the tasks on `cpu` access `resource`,
/// as seen by the task under analysis `analyzed`.
///
/// If `back_to_back` is set, every accessing task on `cpu` contributes
/// an additional `N / T_i` term, where `T_i` is the period of the task
/// under analysis. The result is therefore not symmetric in the two
/// tasks involved.
pub fn processor_access_rate(
    sys: &TaskSystem,
    analyzed: TaskId,
    cpu: ProcessorId,
    resource: ResourceId,
    back_to_back: bool,
) -> Rate {
    let analyzed_period = sys.task(analyzed).period;
    sys.tasks_on(cpu)
        .map(|id| {
            let task = sys.task(id);
            match task.accesses(resource) {
                0 => Rate::zero(),
                n if back_to_back => Rate::of(n, task.period) + Rate::of(n, analyzed_period),
                n => Rate::of(n, task.period),
            }
        })
        .sum()
}

/// The combined rate at which `analyzed` and all its locally
/// higher-priority peers access `resource`.
pub fn local_access_rate(sys: &TaskSystem, analyzed: TaskId, resource: ResourceId) -> Rate {
    let own = access_rate(sys.task(analyzed), resource);
    let peers: Rate = sys
        .local_higher_priority(analyzed)
        .map(|id| access_rate(sys.task(id), resource))
        .sum();
    own + peers
}
