//! # capture-cli
//!
//! Argument parsing, config loading and NDJSON event replay for the `message-capture` binary.

pub mod cli;
pub mod replay;

pub use cli::{describe_config, load_config, Cli, Commands};
pub use replay::{replay, ReplayStats};
