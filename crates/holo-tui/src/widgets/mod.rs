//! Custom widgets for the TUI

pub mod input_box;
pub mod markdown;
pub mod message_list;
pub mod spinner;

pub use input_box::InputBox;
pub use markdown::render_markdown;
pub use message_list::{ChatMessage, MessageList, Role, WELCOME_TEXT, calculate_message_height};
pub use spinner::Spinner;
