// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task state machine (spec.md §4.1).

use serde::{Deserialize, Serialize};

use super::InvalidTransition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Pending,
    Running,
    Success,
    Failed,
    Cancelled,
}

crate::simple_display! {
    TaskState {
        Pending => "PENDING",
        Running => "RUNNING",
        Success => "SUCCESS",
        Failed => "FAILED",
        Cancelled => "CANCELLED",
    }
}

/// Events a caller or the sweeper may apply to a [`TaskFsm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    Fetch,
    Complete,
    Cancel,
    Fail,
    Reset,
}

crate::simple_display! {
    TaskEvent {
        Fetch => "fetch",
        Complete => "complete",
        Cancel => "cancel",
        Fail => "fail",
        Reset => "reset",
    }
}

/// Pure value: `(state, retries, max_retries)`. See spec.md §4.1 for the
/// full transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskFsm {
    pub state: TaskState,
    pub retries: u32,
    pub max_retries: u32,
}

impl TaskFsm {
    pub fn new(max_retries: u32) -> Self {
        Self { state: TaskState::Pending, retries: 0, max_retries }
    }

    /// Construct the machine from values already persisted for a task.
    pub fn from_parts(state: TaskState, retries: u32, max_retries: u32) -> Self {
        Self { state, retries, max_retries }
    }

    /// Apply an event, returning the resulting machine or the illegal
    /// transition that was attempted.
    pub fn apply(self, event: TaskEvent) -> Result<Self, InvalidTransition> {
        use TaskEvent::*;
        use TaskState::*;

        match (self.state, event) {
            (Pending, Fetch) => Ok(Self { state: Running, ..self }),

            (Running, Complete) => Ok(Self { state: Success, ..self }),

            (Pending, Cancel) | (Running, Cancel) => Ok(Self { state: Cancelled, ..self }),

            (Running, Fail) => {
                let retries = self.retries + 1;
                if retries <= self.max_retries {
                    Ok(Self { state: Pending, retries, ..self })
                } else {
                    Ok(Self { state: Failed, retries, ..self })
                }
            }

            (Failed, Reset) | (Cancelled, Reset) | (Success, Reset) => {
                Ok(Self { state: Pending, retries: 0, ..self })
            }

            (state, event) => {
                Err(InvalidTransition::new(state.to_string(), event.to_string()))
            }
        }
    }

}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
