//! Audio plumbing for the capture engine

#[cfg(feature = "audio-io")]
pub mod input;
pub mod meter;
pub mod resampler;
pub mod wav;
