//! Core types shared across the protocol

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hook event type names emitted by Claude Code.
///
/// The set is open-ended: collectors must accept any other name and treat it
/// generically.
pub mod hook_types {
    pub const PRE_TOOL_USE: &str = "PreToolUse";
    pub const POST_TOOL_USE: &str = "PostToolUse";
    pub const USER_PROMPT_SUBMIT: &str = "UserPromptSubmit";
    pub const NOTIFICATION: &str = "Notification";
    pub const STOP: &str = "Stop";
    pub const SUBAGENT_STOP: &str = "SubagentStop";

    /// Every hook type with a dedicated summary rule, in lifecycle order
    pub const ALL: &[&str] = &[
        PRE_TOOL_USE,
        POST_TOOL_USE,
        USER_PROMPT_SUBMIT,
        NOTIFICATION,
        STOP,
        SUBAGENT_STOP,
    ];
}

/// A hook invocation forwarded to the collector.
///
/// `payload` is the raw hook input and is never modified. `chat` and
/// `summary` are omitted from the wire when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub source_app: String,
    pub session_id: String,
    pub hook_event_type: String,
    pub payload: Value,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Event {
    /// The payload's `transcript_path`, when it is a string
    pub fn transcript_path(&self) -> Option<&str> {
        self.payload.get("transcript_path").and_then(Value::as_str)
    }
}
