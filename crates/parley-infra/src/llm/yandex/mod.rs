//! Yandex Foundation Models completion provider.

mod client;
mod types;

pub use client::YandexGptProvider;
