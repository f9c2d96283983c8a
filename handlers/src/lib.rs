//! # Handlers for the capture pipeline
//!
//! Event handlers an event bridge can call: persistence, logging, and a chain that fans an
//! event out to several handlers in order.

mod chain;
mod logging;
mod persistence_handler;

#[cfg(test)]
mod test;

pub use chain::HandlerChain;
pub use logging::LoggingHandler;
pub use persistence_handler::{record_from_event, PersistenceHandler};
