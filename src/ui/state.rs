//! UI-side session state
//!
//! The UI keeps its own mirror of the transcript, built from worker events
//! polled each frame. The worker owns the authoritative transcript; this
//! mirror only exists so rendering never has to reach across the channel.

use crate::session::{Role, SessionCommand, SessionEvent, SessionWorkerHandle, Turn};
use std::path::PathBuf;
use tracing::{info, warn};

/// What the session worker is currently busy with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Ready for input
    Idle,
    /// Capturing a voice utterance
    Listening,
    /// Waiting for the model provider
    Thinking,
}

/// Central UI state
pub struct UiState {
    /// Mirror of the session transcript
    pub turns: Vec<Turn>,

    /// Current text input
    pub input_text: String,

    /// Current worker activity
    pub activity: Activity,

    /// Last error message, shown until the next successful operation
    pub last_error: Option<String>,

    /// Where the most recent export landed
    pub last_export: Option<PathBuf>,

    handle: SessionWorkerHandle,
}

impl UiState {
    pub fn new(handle: SessionWorkerHandle) -> Self {
        Self {
            turns: Vec::new(),
            input_text: String::new(),
            activity: Activity::Idle,
            last_error: None,
            last_export: None,
            handle,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.activity != Activity::Idle
    }

    /// Send the current text input as a user turn
    pub fn send_message(&mut self) {
        let text = self.input_text.trim().to_string();
        if text.is_empty() || self.is_busy() {
            return;
        }

        if let Err(e) = self.handle.send_command(SessionCommand::SubmitText(text)) {
            warn!("failed to submit text: {e}");
            self.last_error = Some(e.user_message());
            return;
        }

        self.activity = Activity::Thinking;
        self.input_text.clear();
    }

    /// Ask the worker to capture a voice utterance
    pub fn start_capture(&mut self) {
        if self.is_busy() {
            return;
        }

        if let Err(e) = self.handle.send_command(SessionCommand::CaptureVoice) {
            warn!("failed to start capture: {e}");
            self.last_error = Some(e.user_message());
            return;
        }

        self.activity = Activity::Listening;
    }

    /// Ask the worker for a rendered transcript
    pub fn request_export(&mut self) {
        if let Err(e) = self.handle.send_command(SessionCommand::Export) {
            warn!("failed to request export: {e}");
            self.last_error = Some(e.user_message());
        }
    }

    /// Process pending worker events, one frame's worth
    pub fn poll_events(&mut self) {
        // Collect first so event handling can borrow self freely
        let mut events = Vec::new();
        while let Some(event) = self.handle.try_recv_event() {
            events.push(event);
        }

        for event in events {
            match event {
                SessionEvent::CaptureStarted => {
                    self.activity = Activity::Listening;
                }
                SessionEvent::UserTurn(turn) => {
                    debug_assert_eq!(turn.role, Role::User);
                    self.turns.push(turn);
                }
                SessionEvent::AwaitingReply => {
                    self.activity = Activity::Thinking;
                }
                SessionEvent::AssistantTurn(turn) => {
                    self.turns.push(turn);
                    self.activity = Activity::Idle;
                    self.last_error = None;
                }
                SessionEvent::TranscriptExported(rendered) => {
                    self.save_export(&rendered);
                }
                SessionEvent::Failure(message) => {
                    warn!("session failure: {message}");
                    self.last_error = Some(message);
                    self.activity = Activity::Idle;
                }
                SessionEvent::Shutdown => {
                    self.activity = Activity::Idle;
                }
            }
        }
    }

    /// Write a rendered transcript next to the user's downloads
    fn save_export(&mut self, rendered: &str) {
        let path = export_path();
        match std::fs::write(&path, rendered) {
            Ok(()) => {
                info!("transcript exported to {:?}", path);
                self.last_export = Some(path);
                self.last_error = None;
            }
            Err(e) => {
                warn!("failed to write transcript: {e}");
                self.last_error = Some(format!("Could not save transcript: {e}"));
            }
        }
    }
}

/// Target path for transcript exports
fn export_path() -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chat_history.txt")
}
