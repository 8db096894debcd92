// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parse_report_status_accepts_documented_values() {
    assert!(matches!(parse_report_status("success"), Ok(ReportStatus::Success)));
    assert!(matches!(parse_report_status("failed"), Ok(ReportStatus::Failed)));
    assert!(matches!(parse_report_status("cancelled"), Ok(ReportStatus::Cancelled)));
}

#[test]
fn parse_report_status_rejects_unknown_value() {
    let err = parse_report_status("done").unwrap_err();
    assert!(matches!(err, Error::BadRequest(_)));
}

#[test]
fn parse_worker_event_accepts_documented_values() {
    assert!(matches!(parse_worker_event("activate"), Ok(WorkerEvent::Activate)));
    assert!(matches!(parse_worker_event("suspend"), Ok(WorkerEvent::Suspend)));
    assert!(matches!(parse_worker_event("failed"), Ok(WorkerEvent::Fail)));
}

#[test]
fn parse_worker_event_rejects_unknown_value() {
    let err = parse_worker_event("retire").unwrap_err();
    assert!(matches!(err, Error::BadRequest(_)));
}

// `Service` itself wraps a live `DbService` and so its operations are
// exercised by the `ty-specs` integration tests (S1-S6) rather than here.
