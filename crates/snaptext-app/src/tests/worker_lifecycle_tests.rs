use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use snaptext_config::SettingsPatch;
use snaptext_types::AppEvent;
use tokio::time::timeout;

use crate::tests::support::{FakeHook, TestRig, rig, some_rect};
use crate::worker::ExtractionWorker;

fn worker_with_hook() -> (
    ExtractionWorker,
    Arc<FakeHook>,
    kanal::AsyncReceiver<AppEvent>,
    TestRig,
) {
    let hook = Arc::new(FakeHook::new());
    let (tx, rx) = kanal::bounded_async(16);
    let rig = rig(some_rect(), SettingsPatch::default());
    let worker = ExtractionWorker::new(hook.clone(), rig.pipeline.clone(), tx);
    (worker, hook, rx, rig)
}

#[tokio::test]
async fn start_twice_is_refused() {
    let (mut worker, hook, _rx, _rig) = worker_with_hook();
    worker.start("shift+alt+a").unwrap();
    assert!(worker.start("shift+alt+a").is_err());
    assert_eq!(hook.live.load(Ordering::SeqCst), 1);
    worker.stop().await;
}

#[tokio::test]
async fn stop_without_start_is_a_noop() {
    let (mut worker, hook, _rx, _rig) = worker_with_hook();
    worker.stop().await;
    worker.stop().await;
    assert!(!worker.is_running());
    assert_eq!(hook.live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn restart_leaves_exactly_one_live_listener() {
    let (mut worker, hook, _rx, _rig) = worker_with_hook();
    worker.start("shift+alt+a").unwrap();
    assert_eq!(hook.live.load(Ordering::SeqCst), 1);

    worker.restart("ctrl+q").await.unwrap();
    assert!(worker.is_running());
    assert_eq!(
        hook.live.load(Ordering::SeqCst),
        1,
        "old registration must be fully released before the new one"
    );

    worker.stop().await;
    assert!(!worker.is_running());
    assert_eq!(hook.live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn hotkey_press_drives_an_extraction() {
    let (mut worker, hook, rx, _rig) = worker_with_hook();
    worker.start("shift+alt+a").unwrap();

    hook.fire.store(true, Ordering::SeqCst);

    let event = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("extraction should complete in time")
        .expect("channel should stay open");
    match event {
        AppEvent::ExtractionComplete { chars, saved } => {
            assert!(chars > 0);
            assert_eq!(saved, None);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    worker.stop().await;
}

#[tokio::test]
async fn stopped_worker_ignores_presses() {
    let (mut worker, hook, rx, _rig) = worker_with_hook();
    worker.start("shift+alt+a").unwrap();
    worker.stop().await;

    hook.fire.store(true, Ordering::SeqCst);
    let result = timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(result.is_err(), "no events after stop");
}
