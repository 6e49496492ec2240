//! The conversation session manager
//!
//! One `Session` exists per UI session; the presentation layer creates it
//! at startup and discards it when the window closes. It owns the
//! transcript and the recording flag, and mediates between the speech
//! capture and model provider collaborators. Collaborator failures come
//! back as closed error enums rather than propagating panics, so every
//! failure path is visible at the call site.

use crate::capture::{CaptureError, SpeechCapture};
use crate::provider::{ModelProvider, ProviderError};
use crate::session::transcript::Transcript;
use crate::session::turn::Turn;
use tracing::{debug, warn};

pub struct Session {
    transcript: Transcript,
    recording: bool,
    capture: Box<dyn SpeechCapture + Send>,
    provider: Box<dyn ModelProvider + Send>,
}

/// Resets the recording flag on every exit path, including unwinding.
struct CapturingGuard<'a>(&'a mut bool);

impl Drop for CapturingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl Session {
    pub fn new(
        capture: Box<dyn SpeechCapture + Send>,
        provider: Box<dyn ModelProvider + Send>,
    ) -> Self {
        Self {
            transcript: Transcript::new(),
            recording: false,
            capture,
            provider,
        }
    }

    /// Whether a voice capture is currently in flight
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Acquire a candidate utterance from the microphone.
    ///
    /// A second call while one is in flight fails fast with
    /// [`CaptureError::Busy`] instead of opening the device twice. Nothing
    /// is committed to the transcript here; the caller decides whether the
    /// recognized text becomes a turn.
    pub fn acquire_by_voice(&mut self) -> Result<String, CaptureError> {
        if self.recording {
            return Err(CaptureError::Busy);
        }
        self.recording = true;
        let _guard = CapturingGuard(&mut self.recording);

        debug!("voice capture started");
        let result = self.capture.listen();
        match &result {
            Ok(text) => debug!("voice capture recognized {} chars", text.len()),
            Err(e) => debug!("voice capture failed: {e}"),
        }
        result
    }

    /// Acquire a candidate utterance from direct text entry.
    ///
    /// Returned verbatim: no trimming, no normalization.
    pub fn acquire_by_text(&self, raw: &str) -> String {
        raw.to_string()
    }

    /// Append a user turn to the transcript.
    ///
    /// Empty or whitespace-only input is rejected here rather than
    /// trusting every caller to filter it.
    pub fn submit_turn(&mut self, utterance: impl Into<String>) {
        let utterance = utterance.into();
        if utterance.trim().is_empty() {
            warn!("ignoring empty utterance");
            return;
        }
        self.transcript.push(Turn::user(utterance));
    }

    /// Request an assistant reply for the given prompt.
    ///
    /// Blocks until the provider answers. Only the given prompt is sent,
    /// not the accumulated transcript. On success the reply is appended
    /// as an assistant turn; on failure the transcript is left untouched.
    pub fn request_reply(&mut self, prompt: &str) -> Result<String, ProviderError> {
        debug!("requesting reply for {} char prompt", prompt.len());
        let reply = self.provider.complete(prompt)?;
        self.transcript.push(Turn::assistant(reply.clone()));
        Ok(reply)
    }

    /// Render the full transcript as plain text. Pure; no side effects.
    pub fn export_transcript(&self) -> String {
        self.transcript.export()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::turn::Role;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    struct FixedCapture(Result<String, CaptureError>);

    impl SpeechCapture for FixedCapture {
        fn listen(&mut self) -> Result<String, CaptureError> {
            self.0.clone()
        }
    }

    struct PanickingCapture;

    impl SpeechCapture for PanickingCapture {
        fn listen(&mut self) -> Result<String, CaptureError> {
            panic!("microphone caught fire");
        }
    }

    struct FixedProvider(Result<String, ProviderError>);

    impl ModelProvider for FixedProvider {
        fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
            self.0.clone()
        }
    }

    fn session(
        capture: Result<String, CaptureError>,
        provider: Result<String, ProviderError>,
    ) -> Session {
        Session::new(Box::new(FixedCapture(capture)), Box::new(FixedProvider(provider)))
    }

    #[test]
    fn full_cycle_appends_alternating_turns() {
        let mut session = session(Ok("unused".into()), Ok("hi there".into()));

        let utterance = session.acquire_by_text("hello");
        assert_eq!(utterance, "hello");
        session.submit_turn(utterance.clone());
        assert_eq!(session.transcript().len(), 1);

        let reply = session.request_reply(&utterance).unwrap();
        assert_eq!(reply, "hi there");
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.export_transcript(), "user: hello\nassistant: hi there");
    }

    #[test]
    fn n_cycles_give_2n_turns_alternating_from_user() {
        let mut session = session(Ok("unused".into()), Ok("ack".into()));

        for i in 0..4 {
            let prompt = format!("question {i}");
            session.submit_turn(prompt.clone());
            session.request_reply(&prompt).unwrap();
        }

        assert_eq!(session.transcript().len(), 8);
        for (i, turn) in session.transcript().turns().iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(turn.role, expected);
        }
    }

    #[test]
    fn acquire_by_text_is_verbatim() {
        let session = session(Ok("unused".into()), Ok("ack".into()));
        assert_eq!(session.acquire_by_text("  spaced  "), "  spaced  ");
    }

    #[test]
    fn empty_utterance_is_not_submitted() {
        let mut session = session(Ok("unused".into()), Ok("ack".into()));
        session.submit_turn("");
        session.submit_turn("   \t\n");
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn voice_success_resets_recording_flag() {
        let mut session = session(Ok("spoken words".into()), Ok("ack".into()));
        let text = session.acquire_by_voice().unwrap();
        assert_eq!(text, "spoken words");
        assert!(!session.is_recording());
    }

    #[test]
    fn voice_failure_resets_flag_and_leaves_transcript_alone() {
        for err in [
            CaptureError::Timeout,
            CaptureError::Unintelligible,
            CaptureError::Service("backend down".into()),
            CaptureError::Setup("no microphone".into()),
        ] {
            let mut session = session(Err(err.clone()), Ok("ack".into()));
            let result = session.acquire_by_voice();
            assert_eq!(result, Err(err));
            assert!(!session.is_recording());
            assert!(session.transcript().is_empty());
        }
    }

    #[test]
    fn recording_flag_resets_even_when_capture_panics() {
        let mut session = Session::new(
            Box::new(PanickingCapture),
            Box::new(FixedProvider(Ok("ack".into()))),
        );

        let outcome = catch_unwind(AssertUnwindSafe(|| session.acquire_by_voice()));
        assert!(outcome.is_err());
        assert!(!session.is_recording());
    }

    #[test]
    fn reply_failure_leaves_user_turn_intact() {
        let mut session = session(
            Ok("unused".into()),
            Err(ProviderError::MissingCredential),
        );

        session.submit_turn("hello");
        let result = session.request_reply("hello");
        assert_eq!(result, Err(ProviderError::MissingCredential));
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript().turns()[0].role, Role::User);
    }
}
