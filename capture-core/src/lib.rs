//! # capture-core
//!
//! Event model consumed from the chat platform ([`MessageCreated`], [`MessageUpdated`]),
//! the [`MessageEventHandler`] trait event bridges call into, and tracing initialization.
//! Transport-agnostic; used by capture-handlers and capture-cli.

pub mod error;
pub mod event;
pub mod logger;

pub use error::{CaptureError, Result};
pub use event::{MessageCreated, MessageEvent, MessageEventHandler, MessageUpdated};
pub use logger::init_tracing;
