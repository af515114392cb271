//! Background thread that decodes uploads and runs detection.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SendError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use web_time::Instant;

use super::{AcquisitionError, AcquisitionEvent, Generation, Segmenter, decode_image};

/// One uploaded photo.
struct AcquireRequest {
    /// Upload this request belongs to
    generation: Generation,
    /// Raw file bytes
    data: Vec<u8>,
}

/// Message sent to the acquisition thread.
enum ThreadMessage {
    Acquire(AcquireRequest),
    Shutdown,
}

/// Owns the acquisition thread and its channels.
///
/// Each submitted upload produces `ImageReady` then `RegionsReady`, or a
/// single `Failed`. Requests queued behind a newer one are skipped without
/// producing any event.
pub struct AcquisitionWorker {
    /// Sender for upload requests to the background thread
    request_tx: Sender<ThreadMessage>,
    /// Receiver for events from the background thread
    result_rx: Receiver<AcquisitionEvent>,
    /// Handle to the background thread (for joining on drop)
    thread_handle: Option<JoinHandle<()>>,
}

impl AcquisitionWorker {
    /// Spawn the worker thread with the given detection backend.
    pub fn spawn(segmenter: Box<dyn Segmenter>) -> Result<Self, AcquisitionError> {
        let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
        let (result_tx, result_rx) = mpsc::channel::<AcquisitionEvent>();

        let thread_handle = thread::Builder::new()
            .name("acquisition".to_string())
            .spawn(move || {
                log::info!("Acquisition thread started ({} segmenter)", segmenter.id());
                Self::thread_loop(segmenter, request_rx, result_tx);
                log::info!("Acquisition thread exiting");
            })?;

        Ok(Self {
            request_tx,
            result_rx,
            thread_handle: Some(thread_handle),
        })
    }

    fn thread_loop(
        mut segmenter: Box<dyn Segmenter>,
        request_rx: Receiver<ThreadMessage>,
        result_tx: Sender<AcquisitionEvent>,
    ) {
        while let Ok(message) = request_rx.recv() {
            let mut request = match message {
                ThreadMessage::Acquire(request) => request,
                ThreadMessage::Shutdown => {
                    log::debug!("Received shutdown signal");
                    return;
                }
            };

            // Only the newest queued upload matters
            loop {
                match request_rx.try_recv() {
                    Ok(ThreadMessage::Acquire(newer)) => {
                        log::debug!(
                            "Skipping upload {} superseded by {}",
                            request.generation,
                            newer.generation
                        );
                        request = newer;
                    }
                    Ok(ThreadMessage::Shutdown) => return,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            if Self::acquire(segmenter.as_mut(), request, &result_tx).is_err() {
                log::warn!("Result channel closed, acquisition thread exiting");
                return;
            }
        }
        log::debug!("Request channel closed");
    }

    /// Decode one upload and run detection on it.
    ///
    /// `ImageReady` is sent as soon as decoding succeeds so the host can show
    /// the photo while detection is still running.
    fn acquire(
        segmenter: &mut dyn Segmenter,
        request: AcquireRequest,
        result_tx: &Sender<AcquisitionEvent>,
    ) -> Result<(), SendError<AcquisitionEvent>> {
        let generation = request.generation;
        let image = match decode_image(&request.data) {
            Ok(image) => Arc::new(image),
            Err(error) => {
                log::warn!("Upload {} could not be decoded: {}", generation, error);
                return result_tx.send(AcquisitionEvent::Failed { generation, error });
            }
        };

        result_tx.send(AcquisitionEvent::ImageReady {
            generation,
            image: Arc::clone(&image),
        })?;

        let started = Instant::now();
        let detected = segmenter.detect(&image);
        log::debug!(
            "Detection for upload {} took {:?}",
            generation,
            started.elapsed()
        );

        let event = match detected {
            Ok(regions) => {
                log::info!("Upload {}: detected {} regions", generation, regions.len());
                AcquisitionEvent::RegionsReady {
                    generation,
                    regions,
                }
            }
            Err(error) => {
                log::warn!("Upload {}: detection failed: {}", generation, error);
                AcquisitionEvent::Failed { generation, error }
            }
        };
        result_tx.send(event)
    }

    /// Queue an upload for decoding and detection.
    pub fn submit(&self, generation: Generation, data: Vec<u8>) -> Result<(), AcquisitionError> {
        self.request_tx
            .send(ThreadMessage::Acquire(AcquireRequest { generation, data }))
            .map_err(|_| AcquisitionError::WorkerUnavailable)?;
        log::debug!("Submitted upload {}", generation);
        Ok(())
    }

    /// Take one finished event without blocking.
    pub fn take_one_result(&self) -> Option<AcquisitionEvent> {
        match self.result_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Acquisition thread disconnected");
                None
            }
        }
    }

    /// Block until an event arrives or `timeout` elapses.
    pub fn wait_result(&self, timeout: Duration) -> Result<Option<AcquisitionEvent>, AcquisitionError> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(AcquisitionError::WorkerUnavailable),
        }
    }
}

impl Drop for AcquisitionWorker {
    fn drop(&mut self) {
        log::debug!("Shutting down acquisition thread");
        let _ = self.request_tx.send(ThreadMessage::Shutdown);

        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                log::warn!("Acquisition thread panicked: {:?}", e);
            }
        }
    }
}
