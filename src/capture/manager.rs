use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::capture::{
    dependencies::CaptureDependencies,
    file::FileSaveConfig,
    pipeline::{CaptureRequest, perform_capture},
    types::{CaptureDestination, CaptureError, CaptureOutcome, CaptureRegion, CaptureStatus},
};

/// Status shared between the worker task and the event loop.
#[derive(Clone, Default)]
struct Shared {
    status: Arc<Mutex<CaptureStatus>>,
}

impl Shared {
    async fn record(&self, outcome: &CaptureOutcome) {
        let status = match outcome {
            CaptureOutcome::Success(_) => CaptureStatus::Success,
            CaptureOutcome::Failed(message) => CaptureStatus::Failed(message.clone()),
            CaptureOutcome::Cancelled(reason) => CaptureStatus::Cancelled(reason.clone()),
        };
        *self.status.lock().await = status;
    }
}

/// Runs region captures one at a time on a Tokio task.
///
/// The Wayland loop is synchronous; it submits with [`Self::request_capture`]
/// and polls with [`Self::try_take_result`]. Every request yields exactly one
/// outcome, delivered in request order.
pub struct CaptureManager {
    request_tx: mpsc::UnboundedSender<CaptureRequest>,
    outcome_rx: Mutex<mpsc::UnboundedReceiver<CaptureOutcome>>,
    shared: Shared,
}

impl CaptureManager {
    pub fn new(runtime_handle: &tokio::runtime::Handle) -> Self {
        Self::with_dependencies(runtime_handle, CaptureDependencies::default())
    }

    pub fn with_dependencies(
        runtime_handle: &tokio::runtime::Handle,
        dependencies: CaptureDependencies,
    ) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel::<CaptureRequest>();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel::<CaptureOutcome>();
        let shared = Shared::default();
        runtime_handle.spawn(serve(
            request_rx,
            outcome_tx,
            shared.clone(),
            Arc::new(dependencies),
        ));
        Self {
            request_tx,
            outcome_rx: Mutex::new(outcome_rx),
            shared,
        }
    }

    /// Queues a capture of `region`. Returns immediately; never retried.
    pub fn request_capture(
        &self,
        region: CaptureRegion,
        destination: CaptureDestination,
        save_config: Option<FileSaveConfig>,
    ) -> Result<(), CaptureError> {
        self.request_tx
            .send(CaptureRequest {
                region,
                destination,
                save_config,
            })
            .map_err(|_| CaptureError::ImageError("Capture manager not running".to_string()))
    }

    pub async fn get_status(&self) -> CaptureStatus {
        self.shared.status.lock().await.clone()
    }

    /// Takes the oldest undelivered outcome, waiting for the lock.
    pub async fn take_result(&self) -> Option<CaptureOutcome> {
        self.outcome_rx.lock().await.try_recv().ok()
    }

    /// Takes the oldest undelivered outcome if the lock is free right now.
    pub fn try_take_result(&self) -> Option<CaptureOutcome> {
        self.outcome_rx
            .try_lock()
            .ok()
            .and_then(|mut outcomes| outcomes.try_recv().ok())
    }

    pub async fn reset(&self) {
        *self.shared.status.lock().await = CaptureStatus::Idle;
    }
}

async fn serve(
    mut requests: mpsc::UnboundedReceiver<CaptureRequest>,
    outcomes: mpsc::UnboundedSender<CaptureOutcome>,
    shared: Shared,
    dependencies: Arc<CaptureDependencies>,
) {
    while let Some(request) = requests.recv().await {
        log::debug!("Processing {:?}", request);
        *shared.status.lock().await = CaptureStatus::InProgress;

        let outcome = match perform_capture(request, Arc::clone(&dependencies)).await {
            Ok(result) => CaptureOutcome::Success(result),
            Err(CaptureError::Cancelled(reason)) => {
                log::info!("Capture cancelled: {}", reason);
                CaptureOutcome::Cancelled(reason)
            }
            Err(e) => {
                log::error!("Capture failed: {}", e);
                CaptureOutcome::Failed(e.to_string())
            }
        };
        shared.record(&outcome).await;
        if outcomes.send(outcome).is_err() {
            log::debug!("Capture outcome dropped; manager is gone");
            break;
        }
    }
    log::debug!("Capture request channel closed");
}

#[cfg(test)]
impl CaptureManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (request_tx, _) = mpsc::unbounded_channel::<CaptureRequest>();
        let (_, outcome_rx) = mpsc::unbounded_channel::<CaptureOutcome>();
        Self {
            request_tx,
            outcome_rx: Mutex::new(outcome_rx),
            shared: Shared::default(),
        }
    }
}
