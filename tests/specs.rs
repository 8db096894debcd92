// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios against a live store, exercising the full
//! credential -> transaction -> FSM path the way a real caller would.
//!
//! Requires a reachable MongoDB deployment that supports multi-document
//! transactions (a replica set, even a single-node one — a standalone
//! `mongod` will reject `start_transaction`). Set `TY_TEST_MONGO_URI` to
//! point at it; defaults to `mongodb://localhost:27017`.

use std::sync::Arc;

use chrono::Duration;
use mongodb::bson::{doc, Bson, Document};
use ty_core::{FakeClock, QueueId};
use ty_server::Service;
use ty_storage::sanitize::QueryFilter;
use ty_storage::{CollectionName, DbService, FetchTaskArgs};

fn test_mongo_uri() -> String {
    std::env::var("TY_TEST_MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

/// Each test gets its own database so concurrent runs never collide.
fn unique_db_name(label: &str) -> String {
    format!("ty_specs_{label}_{}", QueueId::new().suffix())
}

async fn connect(label: &str) -> DbService {
    DbService::connect(&test_mongo_uri(), &unique_db_name(label)).await.expect("connect to test store")
}

async fn connect_with_clock(label: &str, clock: Arc<FakeClock>) -> DbService {
    DbService::connect_with_clock(&test_mongo_uri(), &unique_db_name(label), clock)
        .await
        .expect("connect to test store")
}

fn int_field(doc: &Document, key: &str) -> i64 {
    match doc.get(key) {
        Some(Bson::Int32(v)) => i64::from(*v),
        Some(Bson::Int64(v)) => *v,
        other => panic!("expected integer field {key}, got {other:?}"),
    }
}

fn find_by_id<'a>(docs: &'a [Document], id: &str) -> &'a Document {
    docs.iter().find(|d| d.get_str("_id").unwrap() == id).expect("document present")
}

#[tokio::test]
async fn s1_fetch_respects_priority_then_fifo() {
    let service = Service::new(connect("s1").await);

    service.create_queue("s1-queue", "pw", None).await.expect("create queue");
    let t1 = service
        .create_task("s1-queue", "pw", None, Some(doc! { "n": 1 }), None, None, None, None, None, Some(10))
        .await
        .expect("create t1");
    let t2 = service
        .create_task("s1-queue", "pw", None, Some(doc! { "n": 2 }), None, None, None, None, None, Some(20))
        .await
        .expect("create t2");
    let worker_id = service.create_worker("s1-queue", "pw", None, None, None).await.expect("create worker");

    let fetched = service
        .fetch_task("s1-queue", "pw", FetchTaskArgs { worker_id: Some(worker_id), ..Default::default() })
        .await
        .expect("fetch")
        .expect("higher-priority task available");
    assert_eq!(fetched.get_str("_id").unwrap(), t2.as_str());

    let reported = service
        .worker_report_task_status("s1-queue", "pw", &t2, &worker_id, "success", None)
        .await
        .expect("report success");
    assert!(reported);

    let fetched_again = service
        .fetch_task("s1-queue", "pw", FetchTaskArgs { worker_id: Some(worker_id), ..Default::default() })
        .await
        .expect("fetch")
        .expect("remaining task available");
    assert_eq!(fetched_again.get_str("_id").unwrap(), t1.as_str());

    service.close().await;
}

#[tokio::test]
async fn s2_retry_budget_exhausts_to_failed() {
    let service = Service::new(connect("s2").await);

    service.create_queue("s2-queue", "pw", None).await.expect("create queue");
    let task_id = service
        .create_task("s2-queue", "pw", None, Some(doc! { "n": 1 }), None, None, None, None, Some(2), None)
        .await
        .expect("create task");
    let worker_id = service.create_worker("s2-queue", "pw", None, None, None).await.expect("create worker");

    for attempt in 1..=3u32 {
        let fetched = service
            .fetch_task("s2-queue", "pw", FetchTaskArgs { worker_id: Some(worker_id), ..Default::default() })
            .await
            .expect("fetch");
        if attempt <= 2 {
            let fetched = fetched.expect("task still within its retry budget");
            assert_eq!(fetched.get_str("_id").unwrap(), task_id.as_str());
        } else {
            assert!(fetched.is_none(), "a FAILED task must no longer be fetchable");
            break;
        }
        service
            .worker_report_task_status("s2-queue", "pw", &task_id, &worker_id, "failed", None)
            .await
            .expect("report failed");
    }

    let tasks = service
        .query_collection("s2-queue", "pw", CollectionName::Tasks, QueryFilter::default(), 10, 0)
        .await
        .expect("query tasks");
    let task = find_by_id(&tasks, task_id.as_str());
    assert_eq!(task.get_str("status").unwrap(), "FAILED");
    assert_eq!(int_field(task, "retries"), 3);

    service.close().await;
}

#[tokio::test]
async fn s3_concurrent_fetch_has_exactly_one_winner() {
    let service = Arc::new(Service::new(connect("s3").await));

    service.create_queue("s3-queue", "pw", None).await.expect("create queue");
    service
        .create_task("s3-queue", "pw", None, Some(doc! { "n": 1 }), None, None, None, None, None, None)
        .await
        .expect("create task");
    let worker_a = service.create_worker("s3-queue", "pw", None, None, None).await.expect("create worker a");
    let worker_b = service.create_worker("s3-queue", "pw", None, None, None).await.expect("create worker b");

    let (a, b) = tokio::join!(
        service.fetch_task("s3-queue", "pw", FetchTaskArgs { worker_id: Some(worker_a), ..Default::default() }),
        service.fetch_task("s3-queue", "pw", FetchTaskArgs { worker_id: Some(worker_b), ..Default::default() }),
    );
    let a = a.expect("fetch a");
    let b = b.expect("fetch b");

    let winners: Vec<_> = [a, b].into_iter().flatten().collect();
    assert_eq!(winners.len(), 1, "exactly one racer should win the only pending task");
    let winning_worker = winners[0].get_str("worker_id").unwrap();
    assert!(winning_worker == worker_a.as_str() || winning_worker == worker_b.as_str());

    Arc::try_unwrap(service).ok().expect("sole owner").close().await;
}

#[tokio::test]
async fn s4_heartbeat_timeout_is_swept_back_to_pending() {
    let clock = Arc::new(FakeClock::new());
    let service = Service::new(connect_with_clock("s4", Arc::clone(&clock)).await);

    service.create_queue("s4-queue", "pw", None).await.expect("create queue");
    let task_id = service
        .create_task("s4-queue", "pw", None, Some(doc! { "n": 1 }), None, None, Some(1.0), None, None, None)
        .await
        .expect("create task");
    let worker_id = service.create_worker("s4-queue", "pw", None, None, None).await.expect("create worker");

    service
        .fetch_task("s4-queue", "pw", FetchTaskArgs { worker_id: Some(worker_id), ..Default::default() })
        .await
        .expect("fetch")
        .expect("task available");

    clock.advance(Duration::seconds(3));
    let swept = service.storage().handle_timeouts().await;
    assert_eq!(swept, vec![task_id]);

    let tasks = service
        .query_collection("s4-queue", "pw", CollectionName::Tasks, QueryFilter::default(), 10, 0)
        .await
        .expect("query tasks");
    let task = find_by_id(&tasks, task_id.as_str());
    assert_eq!(task.get_str("status").unwrap(), "PENDING");
    assert_eq!(int_field(task, "retries"), 1);

    let workers = service
        .query_collection("s4-queue", "pw", CollectionName::Workers, QueryFilter::default(), 10, 0)
        .await
        .expect("query workers");
    let worker = find_by_id(&workers, worker_id.as_str());
    assert_eq!(int_field(worker, "retries"), 1);

    // A late heartbeat racing the sweeper must not error even though the
    // task has already left RUNNING.
    let refreshed = service
        .refresh_task_heartbeat("s4-queue", "pw", &task_id)
        .await
        .expect("late heartbeat must not error");
    assert!(!refreshed, "a PENDING task has no heartbeat to refresh");

    service.close().await;
}

#[tokio::test]
async fn s5_update_collection_rejects_immutable_fields() {
    let service = Service::new(connect("s5").await);

    service.create_queue("s5-queue", "pw", None).await.expect("create queue");
    let task_id = service
        .create_task("s5-queue", "pw", None, Some(doc! { "n": 1 }), None, None, None, None, None, None)
        .await
        .expect("create task");

    let before = service
        .query_collection("s5-queue", "pw", CollectionName::Tasks, QueryFilter::default(), 10, 0)
        .await
        .expect("query before");
    let before_doc = find_by_id(&before, task_id.as_str()).clone();

    for field in ["queue_id", "password"] {
        let result = service
            .update_collection(
                "s5-queue",
                "pw",
                CollectionName::Tasks,
                QueryFilter::default(),
                doc! { "$set": { field: "tampered" } },
            )
            .await;
        assert!(result.is_err(), "updating {field} must be rejected");
    }

    let after = service
        .query_collection("s5-queue", "pw", CollectionName::Tasks, QueryFilter::default(), 10, 0)
        .await
        .expect("query after");
    let after_doc = find_by_id(&after, task_id.as_str());
    assert_eq!(&before_doc, after_doc);

    service.close().await;
}

#[tokio::test]
async fn s6_report_with_wrong_worker_id_is_a_conflict() {
    let service = Service::new(connect("s6").await);

    service.create_queue("s6-queue", "pw", None).await.expect("create queue");
    let task_id = service
        .create_task("s6-queue", "pw", None, Some(doc! { "n": 1 }), None, None, None, None, None, None)
        .await
        .expect("create task");
    let owner = service.create_worker("s6-queue", "pw", None, None, None).await.expect("create owner");
    let impostor = service.create_worker("s6-queue", "pw", None, None, None).await.expect("create impostor");

    service
        .fetch_task("s6-queue", "pw", FetchTaskArgs { worker_id: Some(owner), ..Default::default() })
        .await
        .expect("fetch")
        .expect("task available");

    let before = service
        .query_collection("s6-queue", "pw", CollectionName::Tasks, QueryFilter::default(), 10, 0)
        .await
        .expect("query before");
    let before_doc = find_by_id(&before, task_id.as_str()).clone();

    let result =
        service.worker_report_task_status("s6-queue", "pw", &task_id, &impostor, "success", None).await;
    assert!(matches!(result, Err(ty_core::Error::Conflict(_))));

    let after = service
        .query_collection("s6-queue", "pw", CollectionName::Tasks, QueryFilter::default(), 10, 0)
        .await
        .expect("query after");
    let after_doc = find_by_id(&after, task_id.as_str());
    assert_eq!(&before_doc, after_doc);

    service.close().await;
}
