/*! Approximate blocking bounds (Ψ)

For a task under analysis τ_i and each resource k that it accesses,
three rate-based blocking terms are estimated, each summing over all
processors m other than τ_i's own:

- direct blocking `e_k = Σ_m min(φ_local, φ_m)`,
- waiting `w̃_k = Σ_m min(S_m, [φ_m − φ_local]_0)`,
- one-shot blocking `b̃_k = 1/T_i + Σ_m min(1/T_i, [φ_m − φ_local − S_m]_0)`,

where `φ_local` is the access rate of τ_i and its local higher-priority
peers, `φ_m` the (back-to-back inflated) access rate of processor m, and
`S_m` the release rate of the contention set's members on m.

The total bound is
`Ψ = Σ_k e_k·c_k + Σ_k w̃_k·c_k + max_k b̃_k·c_k`: at most one one-shot
event occurs per blocking episode, so only the worst resource counts.

This is an approximation. It is neither guaranteed to be tight nor
safe in every corner case; it is meant to guide the priority
assignment heuristic. */

use crate::contention::ContentionSet;
use crate::model::{ResourceId, TaskId, TaskSystem};
use crate::rate::{local_access_rate, processor_access_rate};
use crate::spin::SpinPriorityMap;
use crate::time::{Duration, Rate};

/// The blocking terms of one resource for one task under analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceBlocking {
    pub resource: ResourceId,
    /// The critical-section cost `c_k`.
    pub cost: Duration,
    /// `e_k`
    pub direct: Rate,
    /// `w̃_k`
    pub waiting: Rate,
    /// `b̃_k`
    pub one_shot: Rate,
}

impl ResourceBlocking {
    pub fn direct_time(&self) -> Duration {
        self.direct * self.cost
    }

    pub fn waiting_time(&self) -> Duration {
        self.waiting * self.cost
    }

    pub fn one_shot_time(&self) -> Duration {
        self.one_shot * self.cost
    }
}

/// The total blocking bound Ψ of a task together with its
/// per-resource breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockingBound {
    per_resource: Vec<ResourceBlocking>,
    total: Duration,
}

impl BlockingBound {
    fn from_terms(per_resource: Vec<ResourceBlocking>) -> Self {
        let direct: Duration = per_resource.iter().map(|b| b.direct_time()).sum();
        let waiting: Duration = per_resource.iter().map(|b| b.waiting_time()).sum();
        let one_shot = per_resource
            .iter()
            .map(|b| b.one_shot_time())
            .fold(Duration::zero(), |worst, t| if t > worst { t } else { worst });
        BlockingBound {
            per_resource,
            total: direct + waiting + one_shot,
        }
    }

    /// Ψ
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Blocking terms in the request order of the task under analysis.
    pub fn per_resource(&self) -> &[ResourceBlocking] {
        &self.per_resource
    }

    pub fn for_resource(&self, resource: ResourceId) -> Option<&ResourceBlocking> {
        self.per_resource.iter().find(|b| b.resource == resource)
    }

    /// `b̃_k·c_k` for `resource`, or zero if the task under analysis
    /// does not access it.
    pub fn one_shot_time(&self, resource: ResourceId) -> Duration {
        self.for_resource(resource)
            .map_or(Duration::zero(), |b| b.one_shot_time())
    }
}

/// The direct-blocking term `e_k` of `analyzed` for `resource`.
pub fn direct_blocking(
    sys: &TaskSystem,
    analyzed: TaskId,
    resource: ResourceId,
    back_to_back: bool,
) -> Rate {
    let phi_local = local_access_rate(sys, analyzed, resource);
    sys.remote_processors(analyzed)
        .map(|cpu| {
            let phi_remote = processor_access_rate(sys, analyzed, cpu, resource, back_to_back);
            phi_local.min(phi_remote)
        })
        .sum()
}

/// The waiting term `w̃_k` of `analyzed` for `resource`, given its
/// current contention set.
pub fn waiting(
    sys: &TaskSystem,
    analyzed: TaskId,
    resource: ResourceId,
    contention: &ContentionSet,
    back_to_back: bool,
) -> Rate {
    let phi_local = local_access_rate(sys, analyzed, resource);
    sys.remote_processors(analyzed)
        .map(|cpu| {
            let releases = contention.release_rate_on(sys, cpu);
            let phi_remote = processor_access_rate(sys, analyzed, cpu, resource, back_to_back);
            releases.min((phi_remote - phi_local).positive_part())
        })
        .sum()
}

/// The one-shot term `b̃_k` of `analyzed` for `resource`, given its
/// current contention set.
pub fn one_shot_blocking(
    sys: &TaskSystem,
    analyzed: TaskId,
    resource: ResourceId,
    contention: &ContentionSet,
    back_to_back: bool,
) -> Rate {
    let once = Rate::once_per(sys.task(analyzed).period);
    let phi_local = local_access_rate(sys, analyzed, resource);
    let remote: Rate = sys
        .remote_processors(analyzed)
        .map(|cpu| {
            let releases = contention.release_rate_on(sys, cpu);
            let phi_remote = processor_access_rate(sys, analyzed, cpu, resource, back_to_back);
            once.min((phi_remote - phi_local - releases).positive_part())
        })
        .sum();
    once + remote
}

/// All blocking terms of `analyzed` for `resource` under the current
/// spin-priority assignment.
pub fn resource_blocking<P>(
    sys: &TaskSystem,
    analyzed: TaskId,
    resource: ResourceId,
    priorities: &P,
    back_to_back: bool,
) -> ResourceBlocking
where
    P: SpinPriorityMap + ?Sized,
{
    let contention = ContentionSet::build(sys, analyzed, resource, priorities);
    ResourceBlocking {
        resource,
        cost: sys.critical_section(resource),
        direct: direct_blocking(sys, analyzed, resource, back_to_back),
        waiting: waiting(sys, analyzed, resource, &contention, back_to_back),
        one_shot: one_shot_blocking(sys, analyzed, resource, &contention, back_to_back),
    }
}

/// Bound the total blocking Ψ of `analyzed` over all resources it
/// accesses, under the current spin-priority assignment. A task that
/// accesses no resources is never blocked.
pub fn bound_blocking<P>(
    sys: &TaskSystem,
    analyzed: TaskId,
    priorities: &P,
    back_to_back: bool,
) -> BlockingBound
where
    P: SpinPriorityMap + ?Sized,
{
    let terms = sys
        .task(analyzed)
        .resources()
        .map(|resource| resource_blocking(sys, analyzed, resource, priorities, back_to_back))
        .collect();
    BlockingBound::from_terms(terms)
}

#[cfg(test)]
mod tests;
