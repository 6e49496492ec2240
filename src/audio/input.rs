//! Microphone input via cpal
//!
//! A `Microphone` wraps the default input device and pushes mono f32
//! chunks into a channel for the duration of one capture. The cpal stream
//! is not `Send`, so a `Microphone` must be created, used, and dropped on
//! the same thread; the capture engine does exactly that per listen call.

use crate::{ParleyError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use tracing::{debug, error, info};

pub struct Microphone {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl Microphone {
    /// Open the default input device
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| ParleyError::AudioDevice("no input device available".into()))?;

        info!(
            "using input device: {}",
            device.name().unwrap_or_else(|_| "unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| ParleyError::AudioDevice(format!("failed to get input config: {e}")))?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Start streaming mono chunks into the given channel.
    ///
    /// Multi-channel input is mixed down by averaging. Chunks are dropped
    /// rather than blocking the audio callback if the channel is full.
    pub fn start(&mut self, audio_tx: Sender<Vec<f32>>) -> Result<()> {
        if self.stream.is_some() {
            return Err(ParleyError::AudioDevice("stream already running".into()));
        }

        let channels = self.config.channels as usize;

        let err_fn = |err| {
            error!("audio input stream error: {err}");
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    if let Err(e) = audio_tx.try_send(samples) {
                        debug!("dropping audio chunk: {e}");
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| ParleyError::AudioDevice(format!("failed to build input stream: {e}")))?;

        stream
            .play()
            .map_err(|e| ParleyError::AudioDevice(format!("failed to start input stream: {e}")))?;

        self.stream = Some(stream);
        debug!("microphone stream started");
        Ok(())
    }

    /// Stop the stream. Also happens on drop.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            debug!("microphone stream stopped");
        }
    }
}

impl Drop for Microphone {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    // These run only where an input device exists; CI machines often
    // have none, so absence is not a failure.

    #[test]
    fn open_reports_sane_format() {
        if let Ok(mic) = Microphone::open() {
            assert!(mic.sample_rate() > 0);
            assert!(mic.channels() > 0);
        }
    }

    #[test]
    fn start_twice_is_rejected() {
        if let Ok(mut mic) = Microphone::open() {
            let (tx, _rx) = bounded(10);
            if mic.start(tx.clone()).is_ok() {
                assert!(mic.start(tx).is_err());
                mic.stop();
            }
        }
    }
}
