// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker state machine (spec.md §4.2).

use serde::{Deserialize, Serialize};

use super::InvalidTransition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkerState {
    Active,
    Suspended,
    Crashed,
}

crate::simple_display! {
    WorkerState {
        Active => "ACTIVE",
        Suspended => "SUSPENDED",
        Crashed => "CRASHED",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerEvent {
    Suspend,
    Activate,
    Fail,
}

crate::simple_display! {
    WorkerEvent {
        Suspend => "suspend",
        Activate => "activate",
        Fail => "fail",
    }
}

/// Pure value: `(state, retries, max_retries)`. See spec.md §4.2 for the
/// full transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerFsm {
    pub state: WorkerState,
    pub retries: u32,
    pub max_retries: u32,
}

impl WorkerFsm {
    pub fn new(max_retries: u32) -> Self {
        Self { state: WorkerState::Active, retries: 0, max_retries }
    }

    pub fn from_parts(state: WorkerState, retries: u32, max_retries: u32) -> Self {
        Self { state, retries, max_retries }
    }

    pub fn apply(self, event: WorkerEvent) -> Result<Self, InvalidTransition> {
        use WorkerEvent::*;
        use WorkerState::*;

        match (self.state, event) {
            (Active, Suspend) => Ok(Self { state: Suspended, ..self }),

            (Suspended, Activate) | (Crashed, Activate) => {
                Ok(Self { state: Active, retries: 0, ..self })
            }

            (Active, Fail) => {
                let retries = self.retries + 1;
                if retries <= self.max_retries {
                    Ok(Self { state: Active, retries, ..self })
                } else {
                    Ok(Self { state: Crashed, retries, ..self })
                }
            }

            (state, event) => {
                Err(InvalidTransition::new(state.to_string(), event.to_string()))
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, WorkerState::Active)
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
