//! Repository trait definitions implemented by parley-infra.

pub mod chat;
pub mod message;

pub use chat::ChatRepository;
pub use message::MessageRepository;
