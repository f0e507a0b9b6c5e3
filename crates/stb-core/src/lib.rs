//! Core domain + application logic for the standup bot.
//!
//! This crate is intentionally framework-agnostic. Telegram lives behind the
//! `MessagingPort` trait implemented in the adapter crate; handlers receive
//! messenger-neutral `IncomingUpdate`s through [`app::App::dispatch`].

pub mod app;
pub mod callback;
pub mod config;
pub mod conversation;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod registration;
pub mod store;
pub mod texts;
pub mod time;

#[cfg(test)]
mod test_support;

pub use errors::{Error, Result};
