//! Polls a [`PointSource`] on a dedicated thread.
//!
//! Socket round-trips to the compositor can stall; keeping them off the event
//! loop means a slow reply delays samples, never rendering or timers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;

use super::{MotionFilter, PointSource, PointerError};
use crate::util::Point;

/// One poll result forwarded to the consumer. Repeated positions are dropped.
pub type PointerReading = Result<Point, PointerError>;

/// Handle to the polling thread; stops it on drop.
pub struct PointerPoller {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PointerPoller {
    /// Starts polling `source` every `interval`.
    ///
    /// `deliver` receives each new position or error and returns `false` once
    /// the consumer is gone, which ends the thread.
    pub fn spawn<S, F>(mut source: S, interval: Duration, mut deliver: F) -> std::io::Result<Self>
    where
        S: PointSource + Send + 'static,
        F: FnMut(PointerReading) -> bool + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name("swirlcap-pointer".to_string())
            .spawn(move || {
                let mut filter = MotionFilter::new();
                while !thread_stop.load(Ordering::Acquire) {
                    let reading = match source.poll() {
                        Ok(Some(point)) => filter.accept(point).map(Ok),
                        Ok(None) => None,
                        Err(err) => Some(Err(err)),
                    };
                    if let Some(reading) = reading {
                        if !deliver(reading) {
                            debug!("Pointer consumer gone, stopping poller");
                            break;
                        }
                    }
                    thread::sleep(interval);
                }
            })?;

        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    /// Signals the thread and waits for it to finish its current poll.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Pointer polling thread panicked");
            }
        }
    }
}

impl Drop for PointerPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    struct Scripted {
        readings: Vec<Result<Option<Point>, PointerError>>,
    }

    impl PointSource for Scripted {
        fn poll(&mut self) -> Result<Option<Point>, PointerError> {
            if self.readings.is_empty() {
                Ok(None)
            } else {
                self.readings.remove(0)
            }
        }
    }

    #[test]
    fn forwards_motion_and_errors_in_order() {
        let source = Scripted {
            readings: vec![
                Ok(Some(Point::new(1.0, 1.0))),
                Ok(Some(Point::new(1.0, 1.0))),
                Ok(None),
                Err(PointerError::InvalidReply("garbage".into())),
                Ok(Some(Point::new(2.0, 1.0))),
            ],
        };
        let (tx, rx) = mpsc::channel();
        let mut poller =
            PointerPoller::spawn(source, Duration::from_millis(1), move |reading| {
                tx.send(reading).is_ok()
            })
            .unwrap();

        let timeout = Duration::from_secs(2);
        assert_eq!(rx.recv_timeout(timeout).unwrap().unwrap(), Point::new(1.0, 1.0));
        assert!(matches!(
            rx.recv_timeout(timeout).unwrap(),
            Err(PointerError::InvalidReply(_))
        ));
        assert_eq!(rx.recv_timeout(timeout).unwrap().unwrap(), Point::new(2.0, 1.0));
        poller.stop();
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn thread_ends_when_consumer_is_gone() {
        let source = Scripted {
            readings: (0..100)
                .map(|i| Ok(Some(Point::new(f64::from(i), 0.0))))
                .collect(),
        };
        let (tx, rx) = mpsc::channel::<PointerReading>();
        drop(rx);
        let mut poller = PointerPoller::spawn(source, Duration::from_millis(1), move |reading| {
            tx.send(reading).is_ok()
        })
        .unwrap();
        // Joins promptly because the first failed delivery ends the loop.
        poller.stop();
        assert!(poller.thread.is_none());
    }
}
