//! Speech-to-text backend

pub mod stt;

pub use stt::Transcriber;
