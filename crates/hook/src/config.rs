//! Command-line configuration for `send-event`.
//!
//! Every tunable flag can also be set through a `HOOKCAST_*` environment
//! variable so hook commands in `settings.json` stay short.

use std::time::Duration;

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use hookcast_protocol::{DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "send-event",
    version,
    about = "Send Claude Code hook events to an observability server"
)]
pub struct Cli {
    /// Source application name
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub source_app: String,

    /// Hook event type (PreToolUse, PostToolUse, etc.)
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub event_type: String,

    /// Collector URL
    #[arg(long, env = "HOOKCAST_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Request timeout in seconds
    #[arg(
        long = "timeout",
        env = "HOOKCAST_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub timeout_secs: u64,

    /// Include chat transcript if available
    #[arg(long)]
    pub add_chat: bool,

    /// Generate a summary of the event
    #[arg(long)]
    pub summarize: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
