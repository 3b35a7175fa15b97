//! Business logic and repository trait definitions for Parley.
//!
//! This crate defines the "ports" (repository and completion-provider
//! traits) that the infrastructure layer implements, plus the services
//! that orchestrate them. It depends only on `parley-types` -- never on
//! `parley-infra` or any database/IO crate.

pub mod access;
pub mod chat;
pub mod completion;
pub mod message;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_support;
