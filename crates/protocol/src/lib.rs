//! hookcast Protocol
//!
//! Wire types shared between the hook programs and observability collectors.
//! Events are serialized as a single JSON object per HTTP POST.

pub mod types;

pub use types::*;

/// Collector endpoint used when no `--server-url` is given
pub const DEFAULT_SERVER_URL: &str = "http://localhost:4000/events";

/// `User-Agent` sent with every forwarded event
pub const USER_AGENT: &str = "Claude-Code-Hook/1.0";

/// Request timeout applied to a delivery when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Session id used when the hook payload carries none
pub const UNKNOWN_SESSION_ID: &str = "unknown";
