//! Dedicated frame-processing thread.
//!
//! Frames are handed over through a one-slot channel. When the pipeline is
//! still busy with the previous frame the new one is dropped, so the worker
//! always acts on recent input and never builds a backlog.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use lazyhand_gesture::FrameInput;

use crate::pipeline::GesturePipeline;
use crate::{PipelineError, Result};

/// Frames waiting for the worker. One slot: anything more is late.
const FRAME_SLOT_CAPACITY: usize = 1;

/// How long the worker waits for a frame before polling voice events.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Log the first drop and then every Nth.
const DROP_LOG_EVERY: u64 = 30;

struct TimedFrame {
    frame: FrameInput,
    received_at: Instant,
}

/// Handle to the frame thread.
pub struct FrameWorker {
    frames: Option<Sender<TimedFrame>>,
    running: Arc<AtomicBool>,
    processed: Arc<AtomicU64>,
    dropped: AtomicU64,
    handle: Option<JoinHandle<()>>,
}

impl FrameWorker {
    /// Start the worker and wait until the pipeline is built.
    ///
    /// `build` runs on the worker thread because platform executors must
    /// stay on the thread that created them.
    pub fn spawn<F>(build: F) -> Result<Self>
    where
        F: FnOnce() -> Result<GesturePipeline> + Send + 'static,
    {
        let (frame_tx, frame_rx) = crossbeam_channel::bounded(FRAME_SLOT_CAPACITY);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<()>>(1);
        let running = Arc::new(AtomicBool::new(true));
        let processed = Arc::new(AtomicU64::new(0));

        let thread_running = Arc::clone(&running);
        let thread_processed = Arc::clone(&processed);
        let handle = std::thread::Builder::new()
            .name("lazyhand-frames".into())
            .spawn(move || {
                let pipeline = match build() {
                    Ok(p) => {
                        let _ = ready_tx.send(Ok(()));
                        p
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                run_frames(pipeline, frame_rx, thread_running, thread_processed);
            })
            .map_err(|e| PipelineError::WorkerStartup(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(e);
            }
            Err(_) => {
                let _ = handle.join();
                return Err(PipelineError::WorkerStartup(
                    "frame worker exited during startup".into(),
                ));
            }
        }

        tracing::info!("Frame worker started");
        Ok(Self {
            frames: Some(frame_tx),
            running,
            processed,
            dropped: AtomicU64::new(0),
            handle: Some(handle),
        })
    }

    /// Offer a frame. Returns `false` if it was dropped.
    pub fn submit(&self, frame: FrameInput) -> bool {
        let Some(frames) = &self.frames else {
            return false;
        };
        let timed = TimedFrame {
            frame,
            received_at: Instant::now(),
        };
        match frames.try_send(timed) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                if dropped % DROP_LOG_EVERY == 1 {
                    tracing::warn!(dropped, "Frame worker busy, dropping late frames");
                }
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("Frame worker gone, frame discarded");
                false
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn processed_frames(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Stop accepting frames and wait for the in-flight one to finish.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.frames.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Frame worker panicked");
            }
            tracing::info!(
                processed = self.processed_frames(),
                dropped = self.dropped_frames(),
                "Frame worker stopped"
            );
        }
    }
}

impl Drop for FrameWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_frames(
    mut pipeline: GesturePipeline,
    frames: Receiver<TimedFrame>,
    running: Arc<AtomicBool>,
    processed: Arc<AtomicU64>,
) {
    // A frame already in the slot when the sender goes away is still processed.
    loop {
        match frames.recv_timeout(IDLE_POLL_INTERVAL) {
            Ok(TimedFrame { frame, received_at }) => {
                if let Some(action) = pipeline.process_frame(&frame, received_at) {
                    tracing::trace!(?action, "Dispatched");
                }
                processed.fetch_add(1, Ordering::Relaxed);
            }
            Err(RecvTimeoutError::Timeout) => {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                pipeline.poll_voice();
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
