//! WAV dumps of captured utterances, for debugging recognition quality

use crate::Result;
use std::path::Path;
use tracing::debug;

/// Write mono f32 samples as a 32-bit float WAV file
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| crate::ParleyError::Io(format!("failed to create {path:?}: {e}")))?;

    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| crate::ParleyError::Io(format!("failed to write sample: {e}")))?;
    }

    writer
        .finalize()
        .map_err(|e| crate::ParleyError::Io(format!("failed to finalize {path:?}: {e}")))?;

    debug!("wrote {} samples to {:?}", samples.len(), path);
    Ok(())
}
