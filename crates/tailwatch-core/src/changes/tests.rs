//! Tests for the change signal bus.

use super::*;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn burst_of_modifications_collapses_to_one_marker() {
    let (notifier, mut changes) = channel();

    for _ in 0..10 {
        notifier.notify_modified();
    }

    assert_eq!(changes.try_recv(), Some(Change::Modified));
    assert_eq!(changes.try_recv(), None);
}

#[tokio::test]
async fn kinds_are_independent() {
    let (notifier, mut changes) = channel();

    notifier.notify_modified();
    notifier.notify_truncated();
    notifier.notify_need_to_close();

    assert!(changes.modified.try_recv().is_ok());
    assert!(changes.truncated.try_recv().is_ok());
    assert!(changes.need_to_close.try_recv().is_ok());
    assert!(changes.deleted.try_recv().is_err());
}

#[tokio::test]
async fn notify_dispatches_by_kind() {
    let (notifier, mut changes) = channel();

    notifier.notify(Change::Deleted);
    assert!(changes.deleted.try_recv().is_ok());
    assert!(changes.modified.try_recv().is_err());
}

#[tokio::test]
async fn close_wakes_a_sleeping_consumer() {
    let (notifier, mut changes) = channel();

    let waiter = tokio::spawn(async move { changes.deleted.recv().await });
    tokio::task::yield_now().await;
    notifier.close();

    let result = timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn pending_marker_survives_close() {
    let (notifier, mut changes) = channel();

    notifier.notify_deleted();
    notifier.close();

    assert_eq!(changes.recv().await, Some(Change::Deleted));
    assert_eq!(changes.recv().await, None);
    assert_eq!(changes.recv().await, None);
}

#[tokio::test]
async fn recv_returns_deleted_after_other_markers() {
    let (notifier, mut changes) = channel();

    notifier.notify_deleted();
    notifier.notify_modified();
    notifier.close();

    assert_eq!(changes.recv().await, Some(Change::Modified));
    assert_eq!(changes.recv().await, Some(Change::Deleted));
    assert_eq!(changes.recv().await, None);
}

#[tokio::test]
async fn notify_after_consumer_dropped_is_a_no_op() {
    let (notifier, changes) = channel();
    drop(changes);

    notifier.notify_modified();
    notifier.notify_deleted();
}

#[tokio::test]
async fn abandoned_resolves_when_consumer_drops() {
    let (notifier, changes) = channel();

    let watch = tokio::spawn(async move { notifier.abandoned().await });
    drop(changes);

    timeout(Duration::from_secs(1), watch).await.unwrap().unwrap();
}

#[tokio::test]
async fn outcome_without_session_is_none() {
    let (_notifier, changes) = channel();
    assert!(changes.outcome().await.is_none());
}
