//! Completion provider implementations.

pub mod yandex;
