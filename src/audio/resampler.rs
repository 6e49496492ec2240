//! Mono resampling to the 16 kHz rate the recognizer expects

use crate::{ParleyError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

const CHUNK_FRAMES: usize = 1024;

/// Streaming mono resampler.
///
/// Feed arbitrary-size chunks with [`push`](MonoResampler::push); resampled
/// output accumulates internally in fixed-size strides and is drained with
/// [`take`](MonoResampler::take). Call [`flush`](MonoResampler::flush) once
/// at the end of a capture to zero-pad and emit the tail.
pub struct MonoResampler {
    resampler: SincFixedIn<f32>,
    input_rate: u32,
    output_rate: u32,
    pending: Vec<f32>,
    output: Vec<f32>,
}

impl MonoResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(ParleyError::Config(
                "sample rates must be greater than 0".into(),
            ));
        }

        let resample_ratio = output_rate as f64 / input_rate as f64;

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, CHUNK_FRAMES, 1)
            .map_err(|e| {
                ParleyError::AudioProcessing(format!("failed to create resampler: {e}"))
            })?;

        debug!("created mono resampler: {input_rate} Hz -> {output_rate} Hz");

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
            pending: Vec::with_capacity(CHUNK_FRAMES),
            output: Vec::new(),
        })
    }

    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Feed input samples, resampling every full stride
    pub fn push(&mut self, samples: &[f32]) -> Result<()> {
        self.pending.extend_from_slice(samples);

        while self.pending.len() >= CHUNK_FRAMES {
            let chunk: Vec<f32> = self.pending.drain(..CHUNK_FRAMES).collect();
            self.process_chunk(&chunk)?;
        }

        Ok(())
    }

    /// Zero-pad and process whatever is left in the input buffer
    pub fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut chunk = std::mem::take(&mut self.pending);
        let actual = chunk.len();
        chunk.resize(CHUNK_FRAMES, 0.0);
        self.process_chunk(&chunk)?;

        // Drop the output frames that correspond to padding
        let ratio = self.output_rate as f64 / self.input_rate as f64;
        let wanted = (actual as f64 * ratio).ceil() as usize;
        let produced = (CHUNK_FRAMES as f64 * ratio).ceil() as usize;
        if produced > wanted {
            let excess = (produced - wanted).min(self.output.len());
            self.output.truncate(self.output.len() - excess);
        }

        Ok(())
    }

    /// Drain the resampled output accumulated so far
    pub fn take(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.output)
    }

    fn process_chunk(&mut self, chunk: &[f32]) -> Result<()> {
        let input_planar = vec![chunk.to_vec()];
        let output_planar = self
            .resampler
            .process(&input_planar, None)
            .map_err(|e| ParleyError::AudioProcessing(format!("resampling failed: {e}")))?;
        self.output.extend_from_slice(&output_planar[0]);
        Ok(())
    }
}

/// Resample a complete mono buffer in one call
pub fn resample_mono(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate {
        return Ok(input.to_vec());
    }

    let mut resampler = MonoResampler::new(input_rate, output_rate)?;
    resampler.push(input)?;
    resampler.flush()?;
    Ok(resampler.take())
}
