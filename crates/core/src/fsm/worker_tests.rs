// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn suspend_moves_active_to_suspended() {
    let fsm = WorkerFsm::new(3).apply(WorkerEvent::Suspend).unwrap();
    assert_eq!(fsm.state, WorkerState::Suspended);
}

#[test]
fn activate_resets_retries_from_suspended_or_crashed() {
    let from_suspended =
        WorkerFsm::from_parts(WorkerState::Suspended, 5, 3).apply(WorkerEvent::Activate).unwrap();
    assert_eq!(from_suspended.state, WorkerState::Active);
    assert_eq!(from_suspended.retries, 0);

    let from_crashed =
        WorkerFsm::from_parts(WorkerState::Crashed, 5, 3).apply(WorkerEvent::Activate).unwrap();
    assert_eq!(from_crashed.state, WorkerState::Active);
    assert_eq!(from_crashed.retries, 0);
}

#[test]
fn fail_under_budget_stays_active_and_increments_retries() {
    let fsm = WorkerFsm::from_parts(WorkerState::Active, 0, 2).apply(WorkerEvent::Fail).unwrap();
    assert_eq!(fsm.state, WorkerState::Active);
    assert_eq!(fsm.retries, 1);
}

#[test]
fn fail_beyond_budget_crashes_the_worker() {
    let fsm = WorkerFsm::from_parts(WorkerState::Active, 2, 2).apply(WorkerEvent::Fail).unwrap();
    assert_eq!(fsm.state, WorkerState::Crashed);
    assert_eq!(fsm.retries, 3);
}

#[test]
fn illegal_transitions_are_rejected() {
    assert!(WorkerFsm::new(3).apply(WorkerEvent::Activate).is_err());
    assert!(WorkerFsm::from_parts(WorkerState::Suspended, 0, 3).apply(WorkerEvent::Fail).is_err());
    assert!(WorkerFsm::from_parts(WorkerState::Crashed, 0, 3).apply(WorkerEvent::Suspend).is_err());
}

#[test]
fn is_active_reflects_state() {
    assert!(WorkerFsm::new(3).is_active());
    assert!(!WorkerFsm::from_parts(WorkerState::Crashed, 0, 3).is_active());
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Mirrors task P1 for the worker side: a `fail` event never leaves
        /// `retries` above `max_retries` while still ACTIVE; once it would,
        /// the worker crashes instead.
        #[test]
        fn fail_never_exceeds_retry_budget_while_active(max_retries in 0u32..20, retries in 0u32..20) {
            let next = WorkerFsm::from_parts(WorkerState::Active, retries, max_retries)
                .apply(WorkerEvent::Fail)
                .unwrap();
            prop_assert_eq!(next.retries, retries + 1);
            if next.retries <= max_retries {
                prop_assert_eq!(next.state, WorkerState::Active);
            } else {
                prop_assert_eq!(next.state, WorkerState::Crashed);
            }
        }

        /// `activate` always zeroes retries regardless of how many were
        /// carried into SUSPENDED/CRASHED.
        #[test]
        fn activate_always_zeroes_retries(
            retries in 0u32..50,
            max_retries in 0u32..20,
            from in prop_oneof![Just(WorkerState::Suspended), Just(WorkerState::Crashed)],
        ) {
            let next = WorkerFsm::from_parts(from, retries, max_retries).apply(WorkerEvent::Activate).unwrap();
            prop_assert_eq!(next.state, WorkerState::Active);
            prop_assert_eq!(next.retries, 0);
        }
    }
}
