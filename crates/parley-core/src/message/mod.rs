//! Message operations and the reply pipeline.

pub mod service;

pub use service::{MessageService, ReplyConfig, BOT_ERROR_REPLY};
