use assert_approx_eq::assert_approx_eq;

use crate::model::{Task, TaskId};
use crate::slack::{extended_execution_time, slack, ExtendedCosts};
use crate::tests::{cpu, d, p, r, res, system, task};

fn t(i: usize) -> TaskId {
    TaskId::from(i)
}

#[test]
fn extended_execution_includes_own_critical_sections() {
    let sys = system(
        1,
        vec![
            task("a", 0, 10.0, 1.0, 1)
                .with_request(r(1), 2)
                .with_request(r(2), 1),
            task("b", 0, 10.0, 2.0, 2),
        ],
        vec![res(1, 1.5), res(2, 0.5)],
    );
    assert_approx_eq!(extended_execution_time(&sys, t(0)).value(), 4.5);
    assert_approx_eq!(extended_execution_time(&sys, t(1)).value(), 2.0);
}

#[test]
fn slack_accounts_for_higher_priority_releases() {
    let sys = system(
        1,
        vec![
            task("h", 0, 4.0, 1.0, 2),
            task("i", 0, 10.0, 2.0, 1).with_request(r(1), 1),
        ],
        vec![res(1, 1.0)],
    );
    let costs = ExtendedCosts::of(&sys);
    // 4 - 1
    assert_approx_eq!(slack(&sys, &costs, t(0)).value(), 3.0);
    // 10 - 3 - ceil(10/4) · 1
    assert_approx_eq!(slack(&sys, &costs, t(1)).value(), 4.0);
}

#[test]
fn slack_uses_exact_release_counts() {
    let sys = system(
        1,
        vec![task("h", 0, 4.0, 1.0, 2), task("i", 0, 8.0, 1.0, 1)],
        vec![],
    );
    let costs = ExtendedCosts::of(&sys);
    // 8 - 1 - 2 · 1
    assert_approx_eq!(slack(&sys, &costs, t(1)).value(), 5.0);
}

#[test]
fn slack_is_clamped_at_zero() {
    let tight = Task::new("i", cpu(0), d(10.0), d(5.0), d(2.0), p(1)).with_request(r(1), 1);
    let sys = system(1, vec![task("h", 0, 4.0, 1.0, 2), tight], vec![res(1, 1.0)]);
    let costs = ExtendedCosts::of(&sys);
    assert_eq!(slack(&sys, &costs, t(1)).value(), 0.0);
}

#[test]
fn slack_ignores_remote_and_lower_priority_tasks() {
    let sys = system(
        2,
        vec![
            task("i", 0, 10.0, 1.0, 2),
            task("lo", 0, 5.0, 3.0, 1),
            task("remote", 1, 2.0, 1.0, 9),
        ],
        vec![],
    );
    let costs = ExtendedCosts::of(&sys);
    assert_approx_eq!(slack(&sys, &costs, t(0)).value(), 9.0);
}
