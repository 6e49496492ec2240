//! Channel-based worker thread driving a `Session` for the UI
//!
//! Capture and provider calls block, so they must not run on the egui
//! thread. The worker owns the session, processes one command at a time,
//! and reports progress as events the UI polls each frame. Sequential
//! command handling is what keeps the acquire -> submit -> reply -> render
//! ordering trivially correct.

use crate::session::manager::Session;
use crate::session::turn::Turn;
use crate::ParleyError;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Commands the UI can send to the session worker
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Capture a voice utterance, then run a full turn cycle with it
    CaptureVoice,

    /// Run a full turn cycle with typed text
    SubmitText(String),

    /// Render the transcript for download
    Export,

    /// Shut the worker down
    Shutdown,
}

/// Events emitted by the session worker
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Voice capture is in progress
    CaptureStarted,

    /// A user turn was appended to the transcript
    UserTurn(Turn),

    /// Waiting for the model provider to reply
    AwaitingReply,

    /// An assistant turn was appended to the transcript
    AssistantTurn(Turn),

    /// The rendered transcript, ready to hand to a download mechanism
    TranscriptExported(String),

    /// An operation failed; the message is user-facing
    Failure(String),

    /// The worker has shut down
    Shutdown,
}

/// Handle for controlling the worker from the UI thread
#[derive(Clone)]
pub struct SessionWorkerHandle {
    command_tx: Sender<SessionCommand>,
    event_rx: Receiver<SessionEvent>,
}

impl SessionWorkerHandle {
    pub fn send_command(&self, cmd: SessionCommand) -> crate::Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| ParleyError::Channel(format!("failed to send command: {e}")))
    }

    pub fn try_recv_event(&self) -> Option<SessionEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocking receive, used by tests
    pub fn recv_event_timeout(&self, timeout: std::time::Duration) -> Option<SessionEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

pub struct SessionWorker {
    session: Session,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
}

impl SessionWorker {
    /// Spawn a worker thread owning the given session
    pub fn spawn(session: Session) -> (SessionWorkerHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = bounded(32);
        let (event_tx, event_rx) = bounded(64);

        let worker = Self {
            session,
            command_rx,
            event_tx,
        };

        let join = thread::spawn(move || worker.run());

        (SessionWorkerHandle { command_tx, event_rx }, join)
    }

    fn run(mut self) {
        info!("session worker started");

        loop {
            match self.command_rx.recv() {
                Ok(SessionCommand::CaptureVoice) => {
                    let _ = self.event_tx.send(SessionEvent::CaptureStarted);
                    match self.session.acquire_by_voice() {
                        Ok(utterance) => self.run_cycle(utterance),
                        Err(e) => {
                            warn!("voice capture failed: {e}");
                            self.report_failure(ParleyError::from(e));
                        }
                    }
                }
                Ok(SessionCommand::SubmitText(raw)) => {
                    let utterance = self.session.acquire_by_text(&raw);
                    self.run_cycle(utterance);
                }
                Ok(SessionCommand::Export) => {
                    let rendered = self.session.export_transcript();
                    debug!("exporting transcript, {} bytes", rendered.len());
                    let _ = self.event_tx.send(SessionEvent::TranscriptExported(rendered));
                }
                Ok(SessionCommand::Shutdown) => {
                    info!("session worker shutting down");
                    let _ = self.event_tx.send(SessionEvent::Shutdown);
                    break;
                }
                Err(_) => {
                    warn!("command channel disconnected");
                    let _ = self.event_tx.send(SessionEvent::Shutdown);
                    break;
                }
            }
        }

        info!("session worker stopped");
    }

    /// One full turn cycle: submit the utterance, then request a reply.
    fn run_cycle(&mut self, utterance: String) {
        if utterance.trim().is_empty() {
            let _ = self
                .event_tx
                .send(SessionEvent::Failure("Nothing to send.".to_string()));
            return;
        }

        self.session.submit_turn(utterance.clone());
        if let Some(turn) = self.session.transcript().last() {
            let _ = self.event_tx.send(SessionEvent::UserTurn(turn.clone()));
        }

        let _ = self.event_tx.send(SessionEvent::AwaitingReply);
        match self.session.request_reply(&utterance) {
            Ok(_) => {
                if let Some(turn) = self.session.transcript().last() {
                    let _ = self.event_tx.send(SessionEvent::AssistantTurn(turn.clone()));
                }
            }
            Err(e) => {
                warn!("reply request failed: {e}");
                self.report_failure(ParleyError::from(e));
            }
        }
    }

    fn report_failure(&self, error: ParleyError) {
        let _ = self.event_tx.send(SessionEvent::Failure(error.user_message()));
    }
}
