//! Microphone capture engine
//!
//! One listen attempt runs through four stages on the calling thread:
//! stream mono audio from the default input device, calibrate an energy
//! threshold against ambient noise, accumulate a VAD-gated utterance
//! honoring the pause threshold and phrase time limit, then hand the
//! buffer to Whisper. The cpal stream lives only for the duration of the
//! call, so the engine itself stays `Send` and can ride along with the
//! session onto its worker thread.

use crate::audio::input::Microphone;
use crate::audio::meter;
use crate::audio::resampler::MonoResampler;
use crate::audio::wav::write_wav;
use crate::capture::{CaptureConfig, CaptureError, SpeechCapture};
use crate::speech::Transcriber;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use voice_activity_detector::VoiceActivityDetector as SileroVad;

/// Sample rate the VAD and Whisper both expect
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// 32 ms at 16 kHz, the Silero VAD frame size
const FRAME_SAMPLES: usize = 512;

const FRAME_SECS: f32 = FRAME_SAMPLES as f32 / TARGET_SAMPLE_RATE as f32;

/// Decides whether one 32 ms frame contains speech
trait SpeechGate {
    fn is_speech(&mut self, frame: &[f32]) -> Result<bool, CaptureError>;
}

/// Energy threshold pre-filter in front of the Silero VAD.
///
/// The energy check keeps quiet rumble from ever reaching the model; the
/// VAD keeps loud non-speech (keyboard, door) from starting an utterance.
struct VadGate {
    vad: SileroVad,
    energy_threshold: f32,
    vad_threshold: f32,
}

impl VadGate {
    fn new(energy_threshold: f32, vad_threshold: f32) -> Result<Self, CaptureError> {
        let vad = SileroVad::builder()
            .sample_rate(TARGET_SAMPLE_RATE as i32)
            .chunk_size(FRAME_SAMPLES)
            .build()
            .map_err(|e| CaptureError::Setup(format!("failed to create VAD: {e:?}")))?;

        Ok(Self {
            vad,
            energy_threshold,
            vad_threshold,
        })
    }
}

impl SpeechGate for VadGate {
    fn is_speech(&mut self, frame: &[f32]) -> Result<bool, CaptureError> {
        if meter::rms(frame) < self.energy_threshold {
            return Ok(false);
        }
        let probability = self.vad.predict(frame.iter().copied());
        Ok(probability >= self.vad_threshold)
    }
}

/// Turns raw device chunks into fixed 32 ms frames at 16 kHz.
struct FrameSource {
    rx: Receiver<Vec<f32>>,
    resampler: Option<MonoResampler>,
    buffer: VecDeque<f32>,
    deadline: Instant,
    closed: bool,
}

impl FrameSource {
    fn new(
        rx: Receiver<Vec<f32>>,
        source_rate: u32,
        config: &CaptureConfig,
    ) -> Result<Self, CaptureError> {
        let resampler = if source_rate == TARGET_SAMPLE_RATE {
            None
        } else {
            Some(
                MonoResampler::new(source_rate, TARGET_SAMPLE_RATE)
                    .map_err(|e| CaptureError::Setup(e.to_string()))?,
            )
        };

        // Hard wall-clock cap so a stalled device cannot hang the worker
        let budget = config.ambient_duration
            + config.listen_timeout
            + config.phrase_time_limit
            + 5.0;

        Ok(Self {
            rx,
            resampler,
            buffer: VecDeque::new(),
            deadline: Instant::now() + Duration::from_secs_f32(budget),
            closed: false,
        })
    }

    /// Next frame, or `None` once the stream is exhausted
    fn next_frame(&mut self) -> Result<Option<Vec<f32>>, CaptureError> {
        loop {
            if self.buffer.len() >= FRAME_SAMPLES {
                let frame: Vec<f32> = self.buffer.drain(..FRAME_SAMPLES).collect();
                return Ok(Some(frame));
            }
            if self.closed {
                return Ok(None);
            }
            if Instant::now() >= self.deadline {
                return Err(CaptureError::Service("audio stream stalled".to_string()));
            }

            match self.rx.recv_timeout(Duration::from_millis(200)) {
                Ok(chunk) => {
                    if let Some(resampler) = &mut self.resampler {
                        resampler
                            .push(&chunk)
                            .map_err(|e| CaptureError::Service(e.to_string()))?;
                        self.buffer.extend(resampler.take());
                    } else {
                        self.buffer.extend(chunk);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    if let Some(resampler) = &mut self.resampler {
                        resampler
                            .flush()
                            .map_err(|e| CaptureError::Service(e.to_string()))?;
                        self.buffer.extend(resampler.take());
                    }
                    self.closed = true;
                }
            }
        }
    }
}

/// Measure ambient noise and derive the effective energy threshold
fn calibrate(frames: &mut FrameSource, config: &CaptureConfig) -> Result<f32, CaptureError> {
    let needed = (config.ambient_duration * TARGET_SAMPLE_RATE as f32) as usize;
    let mut ambient = Vec::with_capacity(needed);

    while ambient.len() < needed {
        match frames.next_frame()? {
            Some(frame) => ambient.extend(frame),
            None => {
                return Err(CaptureError::Service(
                    "audio stream closed during calibration".to_string(),
                ))
            }
        }
    }

    let noise_floor = meter::rms(&ambient);
    let threshold = if config.dynamic_energy {
        config.energy_threshold.max(noise_floor * 1.5)
    } else {
        config.energy_threshold
    };

    debug!("ambient noise floor {noise_floor:.4}, energy threshold {threshold:.4}");
    Ok(threshold)
}

/// Wait for speech, then accumulate until a pause or the phrase limit.
///
/// Time is counted in seconds of audio consumed, not wall clock, so the
/// behavior is identical for a live device and a prerecorded stream.
fn collect_utterance(
    frames: &mut FrameSource,
    gate: &mut dyn SpeechGate,
    config: &CaptureConfig,
) -> Result<Vec<f32>, CaptureError> {
    let mut waited = 0.0f32;
    let first_frame = loop {
        let frame = match frames.next_frame()? {
            Some(frame) => frame,
            None => {
                return Err(CaptureError::Service(
                    "audio stream closed before speech started".to_string(),
                ))
            }
        };
        if gate.is_speech(&frame)? {
            break frame;
        }
        waited += FRAME_SECS;
        if waited >= config.listen_timeout {
            return Err(CaptureError::Timeout);
        }
    };

    let mut utterance = first_frame;
    let mut trailing_silence = 0.0f32;
    loop {
        if utterance.len() as f32 / TARGET_SAMPLE_RATE as f32 >= config.phrase_time_limit {
            debug!("phrase time limit reached");
            break;
        }

        let frame = match frames.next_frame()? {
            Some(frame) => frame,
            // Stream ended mid-utterance; keep what we have
            None => break,
        };

        if gate.is_speech(&frame)? {
            trailing_silence = 0.0;
        } else {
            trailing_silence += FRAME_SECS;
        }
        utterance.extend(frame);

        if trailing_silence >= config.pause_threshold {
            debug!("pause threshold reached");
            break;
        }
    }

    Ok(utterance)
}

/// The production speech capture collaborator
pub struct MicrophoneCapture {
    config: CaptureConfig,
    transcriber: Option<Transcriber>,
}

impl MicrophoneCapture {
    /// Create a capture engine. The Whisper model is loaded lazily on the
    /// first listen attempt so a missing model is a recoverable capture
    /// failure, not a startup failure.
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            transcriber: None,
        }
    }
}

impl SpeechCapture for MicrophoneCapture {
    fn listen(&mut self) -> Result<String, CaptureError> {
        let config = self.config.clone();
        if self.transcriber.is_none() {
            self.transcriber = Some(Transcriber::load(&config)?);
        }
        let transcriber = self
            .transcriber
            .as_ref()
            .ok_or_else(|| CaptureError::Setup("recognizer unavailable".to_string()))?;

        let mut mic = Microphone::open().map_err(|e| CaptureError::Setup(e.to_string()))?;
        let (tx, rx) = bounded(256);
        mic.start(tx).map_err(|e| CaptureError::Setup(e.to_string()))?;

        let mut frames = FrameSource::new(rx, mic.sample_rate(), &config)?;
        let threshold = calibrate(&mut frames, &config)?;
        let mut gate = VadGate::new(threshold, config.vad_threshold)?;

        info!("listening for speech");
        let utterance = collect_utterance(&mut frames, &mut gate, &config)?;
        mic.stop();

        debug!(
            "captured {:.2}s utterance",
            utterance.len() as f32 / TARGET_SAMPLE_RATE as f32
        );

        if let Some(dir) = &config.wav_dump_dir {
            let name = format!("utterance-{}.wav", chrono::Utc::now().format("%Y%m%d-%H%M%S"));
            let path = dir.join(name);
            if let Err(e) = write_wav(&path, &utterance, TARGET_SAMPLE_RATE) {
                warn!("failed to dump utterance wav: {e}");
            }
        }

        let text = transcriber.transcribe(&utterance)?;
        if text.is_empty() {
            return Err(CaptureError::Unintelligible);
        }

        info!("recognized: '{text}'");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::Sender;

    /// Gate keyed on amplitude only, no model involved
    struct AmplitudeGate {
        threshold: f32,
    }

    impl SpeechGate for AmplitudeGate {
        fn is_speech(&mut self, frame: &[f32]) -> Result<bool, CaptureError> {
            Ok(meter::rms(frame) > self.threshold)
        }
    }

    fn send_audio(tx: &Sender<Vec<f32>>, seconds: f32, amplitude: f32) {
        let total = (seconds * TARGET_SAMPLE_RATE as f32) as usize;
        for chunk in vec![amplitude; total].chunks(1600) {
            tx.send(chunk.to_vec()).unwrap();
        }
    }

    fn test_config() -> CaptureConfig {
        CaptureConfig::default()
            .with_ambient_duration(0.1)
            .with_listen_timeout(0.5)
            .with_pause_threshold(0.3)
            .with_phrase_time_limit(2.0)
    }

    fn frame_source(config: &CaptureConfig) -> (Sender<Vec<f32>>, FrameSource) {
        let (tx, rx) = bounded(1024);
        let source = FrameSource::new(rx, TARGET_SAMPLE_RATE, config).unwrap();
        (tx, source)
    }

    #[test]
    fn silence_times_out() {
        let config = test_config();
        let (tx, mut frames) = frame_source(&config);
        send_audio(&tx, 2.0, 0.0);

        let mut gate = AmplitudeGate { threshold: 0.1 };
        let result = collect_utterance(&mut frames, &mut gate, &config);
        assert_eq!(result, Err(CaptureError::Timeout));
    }

    #[test]
    fn utterance_ends_at_pause() {
        let config = test_config();
        let (tx, mut frames) = frame_source(&config);
        send_audio(&tx, 0.2, 0.0);
        send_audio(&tx, 1.0, 0.5);
        send_audio(&tx, 1.0, 0.0);

        let mut gate = AmplitudeGate { threshold: 0.1 };
        let utterance = collect_utterance(&mut frames, &mut gate, &config).unwrap();

        let seconds = utterance.len() as f32 / TARGET_SAMPLE_RATE as f32;
        // Speech plus the closing pause, well short of the trailing second
        assert!(seconds >= 1.0, "got {seconds}s");
        assert!(seconds <= 1.6, "got {seconds}s");
    }

    #[test]
    fn phrase_limit_caps_the_utterance() {
        let config = test_config().with_phrase_time_limit(0.5);
        let (tx, mut frames) = frame_source(&config);
        send_audio(&tx, 3.0, 0.5);

        let mut gate = AmplitudeGate { threshold: 0.1 };
        let utterance = collect_utterance(&mut frames, &mut gate, &config).unwrap();

        let seconds = utterance.len() as f32 / TARGET_SAMPLE_RATE as f32;
        assert!(seconds >= 0.5, "got {seconds}s");
        assert!(seconds < 1.0, "got {seconds}s");
    }

    #[test]
    fn stream_closing_before_speech_is_a_service_error() {
        let config = test_config();
        let (tx, mut frames) = frame_source(&config);
        send_audio(&tx, 0.2, 0.0);
        drop(tx);

        let mut gate = AmplitudeGate { threshold: 0.1 };
        let result = collect_utterance(&mut frames, &mut gate, &config);
        assert!(matches!(result, Err(CaptureError::Service(_))));
    }

    #[test]
    fn stream_closing_mid_utterance_keeps_the_partial() {
        let config = test_config();
        let (tx, mut frames) = frame_source(&config);
        send_audio(&tx, 0.1, 0.0);
        send_audio(&tx, 0.5, 0.5);
        drop(tx);

        let mut gate = AmplitudeGate { threshold: 0.1 };
        let utterance = collect_utterance(&mut frames, &mut gate, &config).unwrap();
        assert!(!utterance.is_empty());
        let seconds = utterance.len() as f32 / TARGET_SAMPLE_RATE as f32;
        assert!(seconds <= 0.6, "got {seconds}s");
    }

    #[test]
    fn calibration_tracks_ambient_noise() {
        let config = test_config().with_ambient_duration(0.5);
        let (tx, mut frames) = frame_source(&config);
        send_audio(&tx, 0.6, 0.2);

        let threshold = calibrate(&mut frames, &config).unwrap();
        // Constant 0.2 amplitude has RMS 0.2; dynamic threshold is 1.5x that
        assert!((threshold - 0.3).abs() < 0.02, "got {threshold}");
    }

    #[test]
    fn static_threshold_ignores_ambient_noise() {
        let mut config = test_config().with_energy_threshold(0.05);
        config.dynamic_energy = false;
        let (tx, mut frames) = frame_source(&config);
        send_audio(&tx, 0.2, 0.4);

        let threshold = calibrate(&mut frames, &config).unwrap();
        assert_eq!(threshold, 0.05);
    }

    #[test]
    fn vad_gate_rejects_silence() {
        if let Ok(mut gate) = VadGate::new(0.01, 0.5) {
            let silence = vec![0.0f32; FRAME_SAMPLES];
            assert!(!gate.is_speech(&silence).unwrap());
        }
    }
}
