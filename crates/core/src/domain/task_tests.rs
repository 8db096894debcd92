// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;

fn fixture(status: TaskState) -> Task {
    let now = Utc::now();
    Task {
        id: TaskId::new(),
        queue_id: QueueId::new(),
        status,
        task_name: None,
        args: Document::new(),
        cmd: None,
        metadata: Document::new(),
        priority: DEFAULT_PRIORITY,
        retries: 0,
        max_retries: DEFAULT_MAX_RETRIES,
        created_at: now,
        start_time: None,
        last_heartbeat: None,
        last_modified: now,
        heartbeat_timeout: None,
        task_timeout: None,
        worker_id: None,
        summary: Document::new(),
    }
}

#[test]
fn pending_task_with_retries_under_budget_is_valid() {
    let mut task = fixture(TaskState::Pending);
    task.retries = 2;
    task.max_retries = 3;
    task.check_invariants();
}

#[test]
#[should_panic]
fn pending_task_with_retries_over_budget_violates_p1() {
    let mut task = fixture(TaskState::Pending);
    task.retries = 4;
    task.max_retries = 3;
    task.check_invariants();
}

#[test]
fn running_task_with_worker_and_start_time_is_valid() {
    let mut task = fixture(TaskState::Running);
    task.worker_id = Some(WorkerId::new());
    task.start_time = Some(Utc::now());
    task.check_invariants();
}

#[test]
#[should_panic]
fn running_task_without_worker_id_violates_p2() {
    let task = fixture(TaskState::Running);
    task.check_invariants();
}

#[test]
#[should_panic]
fn non_running_task_with_worker_id_violates_p3() {
    let mut task = fixture(TaskState::Success);
    task.worker_id = Some(WorkerId::new());
    task.check_invariants();
}
