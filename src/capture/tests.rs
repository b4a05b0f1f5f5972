use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::time::{Duration, sleep};

use super::{
    dependencies::{CaptureClipboard, CaptureDependencies, CaptureFileSaver, CaptureSource},
    file::FileSaveConfig,
    manager::CaptureManager,
    pipeline::{CaptureRequest, perform_capture},
    types::{
        CaptureDestination, CaptureError, CaptureOutcome, CaptureRegion, CaptureStatus,
        OutputGeometry,
    },
};

fn region() -> CaptureRegion {
    CaptureRegion {
        x: 40,
        y: 60,
        width: 300,
        height: 200,
        output: Some(OutputGeometry {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        }),
    }
}

#[derive(Clone, Default)]
struct MockSource {
    error: Arc<Mutex<Option<CaptureError>>>,
    regions: Arc<Mutex<Vec<CaptureRegion>>>,
}

#[async_trait]
impl CaptureSource for MockSource {
    async fn capture(&self, region: CaptureRegion) -> Result<Vec<u8>, CaptureError> {
        self.regions.lock().unwrap().push(region);
        match self.error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(vec![region.width as u8; 4]),
        }
    }
}

#[derive(Clone, Default)]
struct MockSaver {
    should_fail: bool,
    calls: Arc<Mutex<usize>>,
}

impl CaptureFileSaver for MockSaver {
    fn save(&self, _image_data: &[u8], config: &FileSaveConfig) -> Result<PathBuf, CaptureError> {
        *self.calls.lock().unwrap() += 1;
        if self.should_fail {
            Err(CaptureError::SaveError(std::io::Error::other("save failed")))
        } else {
            Ok(config.save_directory.join("swirl.png"))
        }
    }
}

#[derive(Clone, Default)]
struct MockClipboard {
    should_fail: bool,
    calls: Arc<Mutex<usize>>,
}

impl CaptureClipboard for MockClipboard {
    fn copy(&self, _image_data: &[u8]) -> Result<(), CaptureError> {
        *self.calls.lock().unwrap() += 1;
        if self.should_fail {
            Err(CaptureError::ClipboardError("clipboard failure".into()))
        } else {
            Ok(())
        }
    }
}

struct Harness {
    source: MockSource,
    saver: MockSaver,
    clipboard: MockClipboard,
}

impl Harness {
    fn new() -> Self {
        Self {
            source: MockSource::default(),
            saver: MockSaver::default(),
            clipboard: MockClipboard::default(),
        }
    }

    fn dependencies(&self) -> CaptureDependencies {
        CaptureDependencies {
            source: Arc::new(self.source.clone()),
            saver: Arc::new(self.saver.clone()),
            clipboard: Arc::new(self.clipboard.clone()),
        }
    }

    fn saves(&self) -> usize {
        *self.saver.calls.lock().unwrap()
    }

    fn copies(&self) -> usize {
        *self.clipboard.calls.lock().unwrap()
    }
}

fn request(destination: CaptureDestination) -> CaptureRequest {
    CaptureRequest {
        region: region(),
        destination,
        save_config: Some(FileSaveConfig {
            save_directory: PathBuf::from("/tmp/swirlcap-test"),
            ..FileSaveConfig::default()
        }),
    }
}

async fn wait_for_outcome(manager: &CaptureManager) -> Option<CaptureOutcome> {
    for _ in 0..50 {
        if let Some(result) = manager.try_take_result() {
            return Some(result);
        }
        sleep(Duration::from_millis(20)).await;
    }
    None
}

#[tokio::test]
async fn clipboard_only_skips_the_file() {
    let harness = Harness::new();
    let result = perform_capture(
        request(CaptureDestination::ClipboardOnly),
        Arc::new(harness.dependencies()),
    )
    .await
    .unwrap();

    assert!(result.saved_path.is_none());
    assert!(result.copied_to_clipboard);
    assert_eq!(harness.copies(), 1);
    assert_eq!(harness.saves(), 0);
}

#[tokio::test]
async fn file_only_skips_the_clipboard() {
    let harness = Harness::new();
    let result = perform_capture(
        request(CaptureDestination::FileOnly),
        Arc::new(harness.dependencies()),
    )
    .await
    .unwrap();

    assert_eq!(
        result.saved_path,
        Some(PathBuf::from("/tmp/swirlcap-test/swirl.png"))
    );
    assert!(!result.copied_to_clipboard);
    assert_eq!(harness.saves(), 1);
    assert_eq!(harness.copies(), 0);
}

#[tokio::test]
async fn both_destinations_receive_the_image() {
    let harness = Harness::new();
    let result = perform_capture(
        request(CaptureDestination::ClipboardAndFile),
        Arc::new(harness.dependencies()),
    )
    .await
    .unwrap();

    assert!(result.saved_path.is_some());
    assert!(result.copied_to_clipboard);
    assert_eq!(result.image_data, vec![44; 4]);
    assert_eq!(harness.saves(), 1);
    assert_eq!(harness.copies(), 1);
}

#[tokio::test]
async fn source_receives_the_requested_region() {
    let harness = Harness::new();
    perform_capture(
        request(CaptureDestination::ClipboardOnly),
        Arc::new(harness.dependencies()),
    )
    .await
    .unwrap();
    assert_eq!(*harness.source.regions.lock().unwrap(), vec![region()]);
}

#[tokio::test]
async fn clipboard_failure_fails_a_clipboard_only_capture() {
    let mut harness = Harness::new();
    harness.clipboard.should_fail = true;
    let err = perform_capture(
        request(CaptureDestination::ClipboardOnly),
        Arc::new(harness.dependencies()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CaptureError::ClipboardError(_)), "{err:?}");
    assert_eq!(harness.copies(), 1);
    assert_eq!(harness.saves(), 0);
}

#[tokio::test]
async fn clipboard_failure_is_not_fatal_once_the_file_is_saved() {
    let mut harness = Harness::new();
    harness.clipboard.should_fail = true;
    let result = perform_capture(
        request(CaptureDestination::ClipboardAndFile),
        Arc::new(harness.dependencies()),
    )
    .await
    .unwrap();
    assert!(result.saved_path.is_some());
    assert!(!result.copied_to_clipboard);
    assert_eq!(harness.copies(), 1);
}

#[tokio::test]
async fn file_only_without_a_directory_delivers_nothing() {
    let harness = Harness::new();
    let mut req = request(CaptureDestination::FileOnly);
    req.save_config = None;
    let err = perform_capture(req, Arc::new(harness.dependencies()))
        .await
        .unwrap_err();
    assert!(matches!(err, CaptureError::ImageError(_)), "{err:?}");
    assert_eq!(harness.saves(), 0);
    assert_eq!(harness.copies(), 0);
}

#[tokio::test]
async fn save_failure_fails_the_capture() {
    let mut harness = Harness::new();
    harness.saver.should_fail = true;
    let err = perform_capture(
        request(CaptureDestination::FileOnly),
        Arc::new(harness.dependencies()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CaptureError::SaveError(_)), "{err:?}");
    assert_eq!(harness.saves(), 1);
}

#[tokio::test]
async fn source_cancellation_propagates() {
    let harness = Harness::new();
    *harness.source.error.lock().unwrap() = Some(CaptureError::Cancelled("user".into()));
    let err = perform_capture(
        request(CaptureDestination::ClipboardAndFile),
        Arc::new(harness.dependencies()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CaptureError::Cancelled(_)));
    assert_eq!(harness.saves(), 0);
    assert_eq!(harness.copies(), 0);
}

#[tokio::test]
async fn manager_starts_idle() {
    let harness = Harness::new();
    let manager =
        CaptureManager::with_dependencies(&tokio::runtime::Handle::current(), harness.dependencies());
    assert_eq!(manager.get_status().await, CaptureStatus::Idle);
}

#[tokio::test]
async fn manager_reports_success() {
    let harness = Harness::new();
    let manager =
        CaptureManager::with_dependencies(&tokio::runtime::Handle::current(), harness.dependencies());

    manager
        .request_capture(region(), CaptureDestination::ClipboardOnly, None)
        .unwrap();

    match wait_for_outcome(&manager).await {
        Some(CaptureOutcome::Success(result)) => {
            assert!(result.saved_path.is_none());
            assert!(result.copied_to_clipboard);
        }
        other => panic!("Expected success outcome, got {other:?}"),
    }
    assert_eq!(harness.copies(), 1);
    assert_eq!(manager.get_status().await, CaptureStatus::Success);
    assert!(manager.try_take_result().is_none());

    manager.reset().await;
    assert_eq!(manager.get_status().await, CaptureStatus::Idle);
}

#[tokio::test]
async fn manager_reports_failure() {
    let mut harness = Harness::new();
    harness.saver.should_fail = true;
    let manager =
        CaptureManager::with_dependencies(&tokio::runtime::Handle::current(), harness.dependencies());

    manager
        .request_capture(
            region(),
            CaptureDestination::FileOnly,
            Some(FileSaveConfig::default()),
        )
        .unwrap();

    match wait_for_outcome(&manager).await {
        Some(CaptureOutcome::Failed(msg)) => {
            assert!(msg.contains("save failed"), "unexpected failure message: {msg}");
        }
        other => panic!("Expected failure outcome, got {other:?}"),
    }
    assert!(matches!(
        manager.get_status().await,
        CaptureStatus::Failed(_)
    ));
}

#[test]
fn request_fails_when_manager_is_gone() {
    let manager = CaptureManager::with_closed_channel_for_test();
    let err = manager
        .request_capture(region(), CaptureDestination::ClipboardOnly, None)
        .expect_err("should fail when channel closed");
    assert!(
        matches!(err, CaptureError::ImageError(ref msg) if msg.contains("not running")),
        "unexpected error variant: {err:?}"
    );
}

#[tokio::test]
async fn queued_requests_each_report_in_order() {
    let mut harness = Harness::new();
    harness.clipboard.should_fail = true;
    let manager =
        CaptureManager::with_dependencies(&tokio::runtime::Handle::current(), harness.dependencies());

    manager
        .request_capture(
            region(),
            CaptureDestination::FileOnly,
            Some(FileSaveConfig::default()),
        )
        .unwrap();
    manager
        .request_capture(region(), CaptureDestination::ClipboardOnly, None)
        .unwrap();

    let first = wait_for_outcome(&manager).await;
    let second = wait_for_outcome(&manager).await;
    assert!(matches!(first, Some(CaptureOutcome::Success(_))), "{first:?}");
    match second {
        Some(CaptureOutcome::Failed(msg)) => assert!(msg.contains("clipboard failure"), "{msg}"),
        other => panic!("Expected clipboard failure, got {other:?}"),
    }
    assert!(manager.try_take_result().is_none());
    assert_eq!(harness.saves(), 1);
    assert_eq!(harness.copies(), 1);
}
