//! Whisper transcription of captured utterances
//!
//! Loading the model is expensive, so the capture engine keeps one
//! `Transcriber` alive across listen attempts. Errors are reported in the
//! capture taxonomy: load failures are setup errors, mid-transcription
//! failures are service errors.

use crate::capture::{CaptureConfig, CaptureError};
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

pub struct Transcriber {
    context: WhisperContext,
    language: String,
    n_threads: i32,
}

impl Transcriber {
    /// Load the Whisper model named by the capture config
    pub fn load(config: &CaptureConfig) -> Result<Self, CaptureError> {
        if !config.model_path.exists() {
            return Err(CaptureError::Setup(format!(
                "model file not found: {:?}",
                config.model_path
            )));
        }

        info!("loading whisper model from {:?}", config.model_path);

        let path = config
            .model_path
            .to_str()
            .ok_or_else(|| CaptureError::Setup("invalid model path".to_string()))?;

        let context =
            WhisperContext::new_with_params(path, WhisperContextParameters::default()).map_err(
                |e| CaptureError::Setup(format!("failed to load whisper model: {e:?}")),
            )?;

        info!("whisper model loaded");

        Ok(Self {
            context,
            language: config.language.clone(),
            n_threads: config.n_threads,
        })
    }

    /// Transcribe a mono 16 kHz utterance.
    ///
    /// Returns the trimmed best hypothesis, which may be empty when the
    /// model heard nothing it could turn into words.
    pub fn transcribe(&self, samples: &[f32]) -> Result<String, CaptureError> {
        if samples.is_empty() {
            return Err(CaptureError::Service("empty audio buffer".to_string()));
        }

        debug!(
            "transcribing {} samples ({:.2}s)",
            samples.len(),
            samples.len() as f32 / 16000.0
        );

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.n_threads);
        params.set_language(Some(&self.language));
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        let mut state = self
            .context
            .create_state()
            .map_err(|e| CaptureError::Service(format!("failed to create state: {e:?}")))?;

        state
            .full(params, samples)
            .map_err(|e| CaptureError::Service(format!("transcription failed: {e:?}")))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| CaptureError::Service(format!("failed to get segments: {e:?}")))?;

        let mut text = String::new();
        for i in 0..num_segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| CaptureError::Service(format!("failed to get segment text: {e:?}")))?;
            text.push_str(&segment);
        }

        let text = text.trim().to_string();
        debug!("transcription result: '{text}'");
        Ok(text)
    }
}
