//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the Parley chat
//! backend: Chat, Message, User, completion request/response shapes, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod message;
pub mod page;
pub mod user;
