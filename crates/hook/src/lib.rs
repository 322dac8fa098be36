//! hookcast
//!
//! Forwards Claude Code hook payloads to an observability collector. Each
//! invocation reads one JSON object from stdin, wraps it in an
//! [`Event`](hookcast_protocol::Event) and POSTs it once.

pub mod config;
pub mod delivery;
pub mod logging;
pub mod relay;
pub mod settings;
pub mod summary;
pub mod transcript;

pub use config::Cli;
pub use relay::run;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
