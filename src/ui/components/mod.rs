//! Reusable UI components

mod input_bar;
mod message_list;
mod status_bar;

pub use input_bar::InputBar;
pub use message_list::MessageList;
pub use status_bar::StatusBar;
