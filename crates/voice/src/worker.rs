//! Dedicated thread that owns a speech recognizer.
//!
//! The frame loop only ever sends requests and polls events; capture,
//! transcription and even recognizer construction happen here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};

use crate::{Result, SpeechRecognizer};

/// Pending requests beyond this are dropped.
const REQUEST_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceStatus {
    Initializing,
    Ready,
    Unavailable,
}

/// Something the worker wants the pipeline to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    Ready,
    Unavailable(String),
    Started,
    Stopped,
    Transcript(String),
    Failed(String),
}

enum VoiceRequest {
    Start,
    Stop,
    Shutdown,
}

/// Non-blocking handle to a recognizer running on its own thread.
pub struct VoiceWorker {
    requests: Sender<VoiceRequest>,
    events: Receiver<VoiceEvent>,
    status: Arc<Mutex<VoiceStatus>>,
    active: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl VoiceWorker {
    /// Spawn the worker. `factory` runs on the worker thread, so a slow
    /// model load never delays the caller.
    pub fn spawn<F>(factory: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn SpeechRecognizer>> + Send + 'static,
    {
        let (req_tx, req_rx) = crossbeam_channel::bounded(REQUEST_CAPACITY);
        let (evt_tx, evt_rx) = crossbeam_channel::unbounded();
        let status = Arc::new(Mutex::new(VoiceStatus::Initializing));
        let active = Arc::new(AtomicBool::new(false));

        let thread_status = Arc::clone(&status);
        let thread_active = Arc::clone(&active);
        let handle = std::thread::spawn(move || {
            run_worker(factory, req_rx, evt_tx, thread_status, thread_active);
        });

        Self {
            requests: req_tx,
            events: evt_rx,
            status,
            active,
            handle: Some(handle),
        }
    }

    pub fn status(&self) -> VoiceStatus {
        *self.status.lock().expect("voice status mutex poisoned")
    }

    /// Whether capture has been requested and not yet stopped.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Ask the worker to begin capture. Returns `false` when capture is
    /// already active, the recognizer is not ready, or the worker is busy.
    pub fn start(&self) -> bool {
        if self.status() != VoiceStatus::Ready {
            return false;
        }
        // Marked before sending so a fast worker-side failure clears it last.
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        if self.send(VoiceRequest::Start) {
            true
        } else {
            self.active.store(false, Ordering::SeqCst);
            false
        }
    }

    /// Ask the worker to stop capture and transcribe. Returns `false` when
    /// nothing is being captured.
    pub fn stop(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.send(VoiceRequest::Stop) {
            self.active.store(false, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn try_event(&self) -> Option<VoiceEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Everything the worker has reported since the last drain.
    pub fn drain_events(&self) -> Vec<VoiceEvent> {
        self.events.try_iter().collect()
    }

    /// Stop any capture and wait for the worker to exit.
    pub fn shutdown(&mut self) {
        // Blocking send: the worker drains requests, so a full queue clears.
        let _ = self.requests.send(VoiceRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn send(&self, request: VoiceRequest) -> bool {
        match self.requests.try_send(request) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Voice worker busy, dropping request");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("Voice worker gone");
                false
            }
        }
    }
}

impl Drop for VoiceWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker<F>(
    factory: F,
    requests: Receiver<VoiceRequest>,
    events: Sender<VoiceEvent>,
    status: Arc<Mutex<VoiceStatus>>,
    active: Arc<AtomicBool>,
) where
    F: FnOnce() -> Result<Box<dyn SpeechRecognizer>>,
{
    let set_status = |s: VoiceStatus| {
        *status.lock().expect("voice status mutex poisoned") = s;
    };

    let mut recognizer = match factory() {
        Ok(r) => {
            set_status(VoiceStatus::Ready);
            tracing::info!("Speech recognizer ready");
            let _ = events.send(VoiceEvent::Ready);
            r
        }
        Err(e) => {
            set_status(VoiceStatus::Unavailable);
            tracing::warn!(error = %e, "Speech recognizer unavailable");
            let _ = events.send(VoiceEvent::Unavailable(e.to_string()));
            return;
        }
    };

    for request in requests.iter() {
        match request {
            VoiceRequest::Start => {
                if recognizer.is_active() {
                    continue;
                }
                match recognizer.start() {
                    Ok(()) => {
                        let _ = events.send(VoiceEvent::Started);
                    }
                    Err(e) => {
                        active.store(false, Ordering::SeqCst);
                        tracing::warn!(error = %e, "Failed to start voice capture");
                        let _ = events.send(VoiceEvent::Failed(e.to_string()));
                    }
                }
            }
            VoiceRequest::Stop => {
                if !recognizer.is_active() {
                    continue;
                }
                if let Err(e) = recognizer.stop() {
                    tracing::warn!(error = %e, "Failed to stop voice capture");
                    let _ = events.send(VoiceEvent::Failed(e.to_string()));
                    continue;
                }
                let _ = events.send(VoiceEvent::Stopped);

                match recognizer.fetch_result() {
                    Ok(Some(text)) => {
                        let _ = events.send(VoiceEvent::Transcript(text));
                    }
                    Ok(None) => tracing::debug!("Voice capture produced no text"),
                    Err(e) => {
                        tracing::warn!(error = %e, "Transcription failed");
                        let _ = events.send(VoiceEvent::Failed(e.to_string()));
                    }
                }
            }
            VoiceRequest::Shutdown => {
                if recognizer.is_active() {
                    let _ = recognizer.stop();
                }
                break;
            }
        }
    }

    tracing::debug!("Voice worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VoiceError;
    use std::time::{Duration, Instant};

    /// Recognizer that returns a fixed transcript.
    struct ScriptedRecognizer {
        active: bool,
        transcript: Option<String>,
    }

    impl SpeechRecognizer for ScriptedRecognizer {
        fn start(&mut self) -> Result<()> {
            self.active = true;
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            self.active = false;
            Ok(())
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn fetch_result(&mut self) -> Result<Option<String>> {
            Ok(self.transcript.clone())
        }
    }

    fn scripted(transcript: Option<&str>) -> VoiceWorker {
        let transcript = transcript.map(str::to_string);
        VoiceWorker::spawn(move || {
            Ok(Box::new(ScriptedRecognizer {
                active: false,
                transcript,
            }) as Box<dyn SpeechRecognizer>)
        })
    }

    fn wait_for_event(worker: &VoiceWorker) -> Option<VoiceEvent> {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if let Some(e) = worker.try_event() {
                return Some(e);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_start_stop_delivers_transcript() {
        let worker = scripted(Some("hello"));
        assert_eq!(wait_for_event(&worker), Some(VoiceEvent::Ready));
        assert_eq!(worker.status(), VoiceStatus::Ready);

        assert!(worker.start());
        assert!(worker.is_active());
        // Second start while active is a no-op.
        assert!(!worker.start());
        assert_eq!(wait_for_event(&worker), Some(VoiceEvent::Started));

        assert!(worker.stop());
        assert!(!worker.is_active());
        assert_eq!(wait_for_event(&worker), Some(VoiceEvent::Stopped));
        assert_eq!(
            wait_for_event(&worker),
            Some(VoiceEvent::Transcript("hello".to_string()))
        );
    }

    /// Recognizer whose capture device never opens.
    struct BrokenMic;

    impl SpeechRecognizer for BrokenMic {
        fn start(&mut self) -> Result<()> {
            Err(VoiceError::CaptureFailed("device busy".into()))
        }

        fn stop(&mut self) -> Result<()> {
            Ok(())
        }

        fn is_active(&self) -> bool {
            false
        }

        fn fetch_result(&mut self) -> Result<Option<String>> {
            Ok(None)
        }
    }

    #[test]
    fn test_failed_start_clears_active() {
        let worker = VoiceWorker::spawn(|| Ok(Box::new(BrokenMic) as Box<dyn SpeechRecognizer>));
        assert_eq!(wait_for_event(&worker), Some(VoiceEvent::Ready));

        for _ in 0..3 {
            assert!(worker.start());
            assert!(matches!(
                wait_for_event(&worker),
                Some(VoiceEvent::Failed(_))
            ));
            assert!(!worker.is_active());
        }
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let worker = scripted(None);
        assert_eq!(wait_for_event(&worker), Some(VoiceEvent::Ready));
        assert!(!worker.stop());
    }

    #[test]
    fn test_failed_factory_marks_unavailable() {
        let worker = VoiceWorker::spawn(|| Err(VoiceError::Unavailable("no model".into())));
        assert!(matches!(
            wait_for_event(&worker),
            Some(VoiceEvent::Unavailable(_))
        ));
        assert_eq!(worker.status(), VoiceStatus::Unavailable);
        assert!(!worker.start());
    }

    #[test]
    fn test_requests_before_ready_are_ignored() {
        let worker = VoiceWorker::spawn(|| {
            std::thread::sleep(Duration::from_millis(100));
            Err(VoiceError::Unavailable("slow".into()))
        });
        assert_eq!(worker.status(), VoiceStatus::Initializing);
        assert!(!worker.start());
    }

    #[test]
    fn test_shutdown_joins() {
        let mut worker = scripted(None);
        assert_eq!(wait_for_event(&worker), Some(VoiceEvent::Ready));
        worker.shutdown();
        assert!(worker.handle.is_none());
    }
}
