//! Configuration for the speech capture engine

use std::path::PathBuf;

/// Knobs for one listen attempt.
///
/// Durations are in seconds of audio. The defaults mirror a fairly
/// forgiving push-to-talk setup: a second of ambient calibration, five
/// seconds to start speaking, utterances ended by 0.8s of silence and
/// hard-capped at ten seconds.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    /// Minimum RMS energy for a frame to count as speech
    pub energy_threshold: f32,

    /// Raise the energy threshold from measured ambient noise
    pub dynamic_energy: bool,

    /// Seconds of silence that end an utterance
    pub pause_threshold: f32,

    /// Seconds of ambient noise sampled before listening
    pub ambient_duration: f32,

    /// Seconds to wait for speech to start before giving up
    pub listen_timeout: f32,

    /// Hard cap on utterance length in seconds
    pub phrase_time_limit: f32,

    /// Speech probability threshold for the VAD (0.0-1.0)
    pub vad_threshold: f32,

    /// Language to transcribe
    pub language: String,

    /// Path to the Whisper model file
    pub model_path: PathBuf,

    /// Number of threads for transcription
    pub n_threads: i32,

    /// If set, write each accepted utterance as a WAV file here
    pub wav_dump_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            energy_threshold: 0.01,
            dynamic_energy: true,
            pause_threshold: 0.8,
            ambient_duration: 1.0,
            listen_timeout: 5.0,
            phrase_time_limit: 10.0,
            vad_threshold: 0.5,
            language: "en".to_string(),
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            n_threads: 4,
            wav_dump_dir: None,
        }
    }
}

impl CaptureConfig {
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_pause_threshold(mut self, seconds: f32) -> Self {
        self.pause_threshold = seconds;
        self
    }

    pub fn with_listen_timeout(mut self, seconds: f32) -> Self {
        self.listen_timeout = seconds;
        self
    }

    pub fn with_phrase_time_limit(mut self, seconds: f32) -> Self {
        self.phrase_time_limit = seconds;
        self
    }

    pub fn with_ambient_duration(mut self, seconds: f32) -> Self {
        self.ambient_duration = seconds;
        self
    }

    pub fn with_energy_threshold(mut self, threshold: f32) -> Self {
        self.energy_threshold = threshold;
        self
    }

    pub fn with_wav_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.wav_dump_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CaptureConfig::default();
        assert_eq!(config.pause_threshold, 0.8);
        assert_eq!(config.ambient_duration, 1.0);
        assert_eq!(config.listen_timeout, 5.0);
        assert_eq!(config.phrase_time_limit, 10.0);
        assert_eq!(config.language, "en");
        assert!(config.dynamic_energy);
        assert!(config.wav_dump_dir.is_none());
    }

    #[test]
    fn builder_pattern() {
        let config = CaptureConfig::default()
            .with_model_path("models/ggml-small.en.bin")
            .with_listen_timeout(2.0)
            .with_pause_threshold(0.5);

        assert_eq!(config.model_path.to_str().unwrap(), "models/ggml-small.en.bin");
        assert_eq!(config.listen_timeout, 2.0);
        assert_eq!(config.pause_threshold, 0.5);
    }
}
