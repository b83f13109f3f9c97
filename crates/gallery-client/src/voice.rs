//! Simulated voice input for captions.
//!
//! There is no speech recognition here: a recording "hears" a canned
//! sentence after a fixed delay.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use gallery_shared::constants::MOCK_VOICE_DELAY_MS;

pub const MOCK_TRANSCRIPT: &str = "A beautiful sunset over the mountains";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceState {
    pub is_recording: bool,
    pub transcript: String,
}

pub struct MockVoiceRecognizer {
    state: Arc<watch::Sender<VoiceState>>,
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Default for MockVoiceRecognizer {
    fn default() -> Self {
        Self::new(Duration::from_millis(MOCK_VOICE_DELAY_MS))
    }
}

impl MockVoiceRecognizer {
    pub fn new(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(VoiceState::default());
        Self {
            state: Arc::new(tx),
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<VoiceState> {
        self.state.subscribe()
    }

    /// Begin a recording. Must be called from within a tokio runtime.
    pub fn start(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.is_recording = true;
            s.transcript.clear();
        });
        debug!("Voice recording started");

        let state = self.state.clone();
        let current = self.generation.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            state.send_modify(|s| {
                s.is_recording = false;
                s.transcript = MOCK_TRANSCRIPT.to_string();
            });
        });
    }

    /// End the recording early; the pending transcript is dropped.
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|s| s.is_recording = false);
        debug!("Voice recording stopped");
    }

    pub fn clear_transcript(&self) {
        self.state.send_modify(|s| s.transcript.clear());
    }
}
