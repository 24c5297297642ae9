//! Tests for event translation and the event sources.

use super::notify_source::translate;
use super::*;
use notify::event::{
    AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode,
};
use notify::{Event, EventKind};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::timeout;

fn event(kind: EventKind, paths: &[&str]) -> Event {
    paths
        .iter()
        .fold(Event::new(kind), |e, p| e.add_path(PathBuf::from(p)))
}

#[test]
fn translate_basic_kinds() {
    let cases = [
        (EventKind::Create(CreateKind::File), Op::Create),
        (
            EventKind::Modify(ModifyKind::Data(DataChange::Any)),
            Op::Write,
        ),
        (EventKind::Modify(ModifyKind::Any), Op::Write),
        (
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
            Op::Chmod,
        ),
        (
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            Op::Rename,
        ),
        (
            EventKind::Modify(ModifyKind::Name(RenameMode::Any)),
            Op::Rename,
        ),
        (
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            Op::Create,
        ),
        (EventKind::Remove(RemoveKind::File), Op::Remove),
    ];

    for (kind, op) in cases {
        let events = translate(&event(kind, &["/logs/app.log"]));
        assert_eq!(events, vec![FsEvent::new("/logs/app.log", op)], "{kind:?}");
    }
}

#[test]
fn translate_rename_both_splits_paths() {
    let events = translate(&event(
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
        &["/logs/app.log", "/logs/app.log.1"],
    ));
    assert_eq!(
        events,
        vec![
            FsEvent::new("/logs/app.log", Op::Rename),
            FsEvent::new("/logs/app.log.1", Op::Create),
        ]
    );
}

#[test]
fn translate_drops_access_and_unknown() {
    assert!(translate(&event(EventKind::Access(AccessKind::Any), &["/a"])).is_empty());
    assert!(translate(&event(EventKind::Any, &["/a"])).is_empty());
    assert!(translate(&event(EventKind::Other, &["/a"])).is_empty());
}

#[test]
fn translate_one_event_per_path() {
    let events = translate(&event(
        EventKind::Remove(RemoveKind::Any),
        &["/a", "/b"],
    ));
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.op == Op::Remove));
}

#[tokio::test]
async fn manual_source_broadcasts_to_every_subscriber() {
    let source = ManualEventSource::default();
    let mut rx1 = source.subscribe();
    let mut rx2 = source.subscribe();

    assert_eq!(source.emit("/logs/app.log", Op::Write), 2);

    assert_eq!(
        rx1.recv().await.unwrap(),
        FsEvent::new("/logs/app.log", Op::Write)
    );
    assert_eq!(
        rx2.recv().await.unwrap(),
        FsEvent::new("/logs/app.log", Op::Write)
    );
}

#[tokio::test]
async fn manual_source_close_ends_stream() {
    let source = ManualEventSource::default();
    let mut rx = source.subscribe();

    source.close();
    assert!(matches!(rx.recv().await, Err(RecvError::Closed)));

    let mut late = source.subscribe();
    assert!(matches!(late.recv().await, Err(RecvError::Closed)));
    assert_eq!(source.emit("/a", Op::Write), 0);
}

#[test]
fn manual_source_counts_registrations() {
    let source = ManualEventSource::default();
    let dir = Path::new("/logs");

    source.add(dir).unwrap();
    source.add(dir).unwrap();
    assert_eq!(source.registrations(), 1);

    source.remove(dir).unwrap();
    assert!(source.is_registered(dir));
    source.remove(dir).unwrap();
    assert!(!source.is_registered(dir));
    assert_eq!(source.registrations(), 0);

    assert!(matches!(
        source.remove(dir),
        Err(WatchError::Unwatch { .. })
    ));
}

#[test]
fn manual_source_can_refuse_registrations() {
    let source = ManualEventSource::default();
    source.refuse_registrations(true);

    let err = source.add(Path::new("/logs")).unwrap_err();
    assert!(matches!(err, WatchError::Watch { .. }));
    assert_eq!(source.registrations(), 0);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn notify_source_reports_create_in_watched_dir() {
    let dir = tempfile::tempdir().unwrap();
    let source = NotifyEventSource::new(256).unwrap();
    let mut rx = source.subscribe();

    source.add(dir.path()).unwrap();
    let path = dir.path().join("app.log");
    std::fs::write(&path, "hello\n").unwrap();

    let found = timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await {
                Ok(e) if e.path == path && e.op == Op::Create => return true,
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return false,
            }
        }
    })
    .await
    .unwrap();
    assert!(found);

    source.remove(dir.path()).unwrap();
    assert_eq!(source.registrations(), 0);
}

#[cfg(target_os = "linux")]
#[test]
fn notify_source_shares_registrations() {
    let dir = tempfile::tempdir().unwrap();
    let source = NotifyEventSource::new(16).unwrap();

    source.add(dir.path()).unwrap();
    source.add(dir.path()).unwrap();
    assert_eq!(source.registrations(), 1);
    assert!(source.is_registered(dir.path()));

    source.remove(dir.path()).unwrap();
    assert_eq!(source.registrations(), 1);
    source.remove(dir.path()).unwrap();
    assert_eq!(source.registrations(), 0);
}

#[cfg(target_os = "linux")]
#[test]
fn notify_source_rejects_missing_path() {
    let source = NotifyEventSource::new(16).unwrap();
    let missing = Path::new("/nonexistent/tailwatch/dir");
    let err = source.add(missing).unwrap_err();
    assert!(matches!(err, WatchError::Watch { .. }));
    assert_eq!(source.registrations(), 0);
    assert!(!source.is_registered(missing));

    // A failed watch leaves no count behind, so the next add tries again.
    assert!(source.add(missing).is_err());
    assert_eq!(source.registrations(), 0);
}

#[cfg(target_os = "linux")]
#[test]
fn notify_source_refuses_after_close() {
    let dir = tempfile::tempdir().unwrap();
    let source = NotifyEventSource::new(16).unwrap();
    source.close();

    assert!(matches!(source.add(dir.path()), Err(WatchError::Closed)));
}
