// Claude module
// Public interface for talking to the Claude Messages API

mod client;
mod types;

pub use client::ClaudeClient;
pub use types::{ContentBlock, Message, MessageRequest, MessageResponse};
