//! Rule-based event summaries.
//!
//! Each known hook type maps to a pure formatting rule. Rules never call out
//! to a model; a rule that cannot read its input falls back to a generic line.

use hookcast_protocol::{hook_types, Event};
use serde_json::Value;

/// Number of words kept from prompts and notification messages.
const PREVIEW_WORDS: usize = 5;

/// A rule returns `None` when the payload has an unexpected shape.
type SummaryRule = fn(&Value) -> Option<String>;

const SUMMARY_RULES: &[(&str, SummaryRule)] = &[
    (hook_types::PRE_TOOL_USE, pre_tool_use),
    (hook_types::POST_TOOL_USE, post_tool_use),
    (hook_types::USER_PROMPT_SUBMIT, user_prompt_submit),
    (hook_types::NOTIFICATION, notification),
    (hook_types::STOP, stop),
    (hook_types::SUBAGENT_STOP, subagent_stop),
];

/// Summarize an event in one short human-readable line.
///
/// Always produces a line for a well-formed event; the `Option` leaves room
/// for rules that decline to summarize.
pub fn summarize(event: &Event) -> Option<String> {
    summarize_parts(&event.hook_event_type, &event.payload)
}

/// Summarize from the raw event type and payload.
pub fn summarize_parts(event_type: &str, payload: &Value) -> Option<String> {
    let rule = SUMMARY_RULES
        .iter()
        .find(|(name, _)| *name == event_type)
        .map(|(_, rule)| *rule);

    match rule {
        Some(rule) => Some(rule(payload).unwrap_or_else(|| format!("Event: {event_type}"))),
        None => Some(format!("Hook event: {event_type}")),
    }
}

fn pre_tool_use(payload: &Value) -> Option<String> {
    Some(format!("About to execute {}", tool_name(payload)?))
}

fn post_tool_use(payload: &Value) -> Option<String> {
    Some(format!("Completed execution of {}", tool_name(payload)?))
}

fn user_prompt_submit(payload: &Value) -> Option<String> {
    match text_field(payload, "prompt")? {
        Some(prompt) => Some(format!("User prompt: {}", preview(prompt))),
        None => Some("User submitted prompt".to_string()),
    }
}

fn notification(payload: &Value) -> Option<String> {
    match text_field(payload, "message")? {
        Some(message) => Some(format!("Notification: {}", preview(message))),
        None => Some("System notification".to_string()),
    }
}

fn stop(_: &Value) -> Option<String> {
    Some("Task completed".to_string())
}

fn subagent_stop(_: &Value) -> Option<String> {
    Some("Sub-agent task completed".to_string())
}

fn tool_name(payload: &Value) -> Option<String> {
    let name = match payload.as_object()?.get("tool_name") {
        None | Some(Value::Null) => "unknown tool".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    Some(name)
}

/// Reads an optional text field.
///
/// Outer `None` means the payload is malformed; inner `None` means the field
/// is missing or empty. `false`, `0`, `[]` and `{}` count as empty.
fn text_field<'a>(payload: &'a Value, key: &str) -> Option<Option<&'a str>> {
    match payload.as_object()?.get(key) {
        None => Some(None),
        Some(Value::String(s)) if !s.is_empty() => Some(Some(s.as_str())),
        Some(value) if is_empty_value(value) => Some(None),
        Some(_) => None,
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn preview(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(PREVIEW_WORDS).collect();
    let mut out = words.join(" ");
    if words.len() >= PREVIEW_WORDS {
        out.push_str("...");
    }
    out
}
