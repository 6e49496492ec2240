//! Conversation session management
//!
//! This module owns the turn-taking workflow of the application: an
//! append-only transcript of role-tagged turns, two input paths (voice
//! capture and direct text entry), and reply acquisition from the model
//! provider.
//!
//! - **turn**: the `Role` and `Turn` types
//! - **transcript**: the ordered, append-only turn list and its exports
//! - **manager**: the `Session` itself, one per UI session
//! - **worker**: channel-based worker thread driving a `Session` for the UI

pub mod manager;
pub mod transcript;
pub mod turn;
pub mod worker;

pub use manager::Session;
pub use transcript::Transcript;
pub use turn::{Role, Turn};
pub use worker::{SessionCommand, SessionEvent, SessionWorker, SessionWorkerHandle};
