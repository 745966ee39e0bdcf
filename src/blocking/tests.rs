use std::collections::HashMap;

use assert_approx_eq::assert_approx_eq;

use crate::blocking::{bound_blocking, resource_blocking};
use crate::model::{Priority, ResourceId, TaskId};
use crate::spin::SpinPriorities;
use crate::tests::{p, r, res, system, task, two_singletons};

fn t(i: usize) -> TaskId {
    TaskId::from(i)
}

type Prios = HashMap<(TaskId, ResourceId), Priority>;

#[test]
fn two_singletons_closed_form() {
    // T = D = 10, C = 1, N = 1, c = 1 on both processors
    let sys = two_singletons(5, 5);
    let prios = SpinPriorities::initialize(&sys, true);
    for id in [t(0), t(1)] {
        let terms = resource_blocking(&sys, id, r(1), &prios, true);
        // φ_local = 0.1, φ_m = 0.1 + 0.1 (back-to-back)
        assert_approx_eq!(terms.direct.value(), 0.1);
        // Γ is empty
        assert_eq!(terms.waiting.value(), 0.0);
        // 1/T + min(1/T, 0.2 - 0.1)
        assert_approx_eq!(terms.one_shot.value(), 0.2);

        let bound = bound_blocking(&sys, id, &prios, true);
        assert_approx_eq!(bound.total().value(), 0.3);
    }
}

#[test]
fn two_singletons_without_back_to_back() {
    let sys = two_singletons(5, 5);
    let prios = Prios::new();
    let terms = resource_blocking(&sys, t(0), r(1), &prios, false);
    assert_approx_eq!(terms.direct.value(), 0.1);
    assert_eq!(terms.waiting.value(), 0.0);
    assert_approx_eq!(terms.one_shot.value(), 0.1);
    assert_approx_eq!(bound_blocking(&sys, t(0), &prios, false).total().value(), 0.2);
}

#[test]
fn contention_shifts_one_shot_to_waiting() {
    let sys = two_singletons(1, 1);
    let mut prios = Prios::new();
    prios.insert((t(1), r(1)), p(3));
    let terms = resource_blocking(&sys, t(0), r(1), &prios, true);
    assert_approx_eq!(terms.direct.value(), 0.1);
    // S = 1/10, rem = 0.2 - 0.1
    assert_approx_eq!(terms.waiting.value(), 0.1);
    // 1/10 + min(1/10, [0.2 - 0.1 - 0.1]_0)
    assert_approx_eq!(terms.one_shot.value(), 0.1);
    assert_approx_eq!(bound_blocking(&sys, t(0), &prios, true).total().value(), 0.3);
}

#[test]
fn no_requests_no_blocking() {
    let sys = system(
        2,
        vec![
            task("idle", 0, 10.0, 1.0, 1),
            task("busy", 1, 10.0, 1.0, 1).with_request(r(1), 4),
        ],
        vec![res(1, 2.0)],
    );
    let bound = bound_blocking(&sys, t(0), &SpinPriorities::initialize(&sys, true), true);
    assert_eq!(bound.total().value(), 0.0);
    assert!(bound.per_resource().is_empty());
}

#[test]
fn one_shot_takes_worst_resource_only() {
    let sys = system(
        2,
        vec![
            task("a", 0, 10.0, 1.0, 1)
                .with_request(r(1), 1)
                .with_request(r(2), 1),
            task("b", 1, 10.0, 1.0, 1)
                .with_request(r(1), 1)
                .with_request(r(2), 1),
        ],
        vec![res(1, 1.0), res(2, 3.0)],
    );
    let bound = bound_blocking(&sys, t(0), &Prios::new(), true);
    assert_eq!(bound.per_resource().len(), 2);
    assert_approx_eq!(bound.one_shot_time(r(1)).value(), 0.2);
    assert_approx_eq!(bound.one_shot_time(r(2)).value(), 0.6);
    assert_eq!(bound.one_shot_time(r(9)).value(), 0.0);
    // direct: 0.1·1 + 0.1·3, waiting: 0, one-shot: max(0.2, 0.6)
    assert_approx_eq!(bound.total().value(), 1.0);
}

#[test]
fn sums_over_remote_processors() {
    let sys = system(
        3,
        vec![
            task("a", 0, 10.0, 1.0, 1).with_request(r(1), 1),
            task("b", 1, 10.0, 1.0, 1).with_request(r(1), 1),
            task("c", 2, 5.0, 1.0, 1).with_request(r(1), 1),
        ],
        vec![res(1, 2.0)],
    );
    let terms = resource_blocking(&sys, t(0), r(1), &Prios::new(), true);
    // cpu 1: φ = 0.2; cpu 2: φ = 0.2 + 0.1 = 0.3
    assert_approx_eq!(terms.direct.value(), 0.2);
    assert_eq!(terms.waiting.value(), 0.0);
    assert_approx_eq!(terms.one_shot.value(), 0.3);
    // (0.2 + 0 ) · 2 + 0.3 · 2
    assert_approx_eq!(bound_blocking(&sys, t(0), &Prios::new(), true).total().value(), 1.0);
}
