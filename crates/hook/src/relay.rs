//! One hook invocation: stdin → event → collector.
//!
//! The hook is a side channel. Apart from unreadable input, nothing that
//! happens here may fail the caller's workflow, so [`run`] always exits 0 once
//! the payload has been parsed.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use hookcast_protocol::{Event, UNKNOWN_SESSION_ID};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Cli;
use crate::delivery::{DeliveryClient, DeliveryError};
use crate::summary;
use crate::transcript;

/// Exit status for a payload that could not be parsed.
pub const INPUT_ERROR_EXIT: u8 = 1;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to parse JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse JSON input: expected an object, got {0}")]
    NotAnObject(&'static str),
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("collector rejected event with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl RelayError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RelayError::Delivery(e) if e.is_timeout())
    }
}

/// Run a full delivery cycle and map it to the process exit status.
pub async fn run(cli: &Cli, input: impl Read) -> ExitCode {
    debug!(component = "relay", event = "relay.args", args = ?cli);

    let payload = match read_payload(input) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(INPUT_ERROR_EXIT);
        }
    };

    let client = DeliveryClient::new(cli.timeout());
    if let Err(e) = relay(cli, payload, &client).await {
        warn!(
            component = "relay",
            event = "relay.failed",
            error = %e,
            timeout = e.is_timeout(),
            "Failed to send event to server"
        );
    }

    ExitCode::SUCCESS
}

/// Parse the hook payload. Only a JSON object is accepted.
pub fn read_payload(input: impl Read) -> Result<Map<String, Value>, InputError> {
    match serde_json::from_reader(input)? {
        Value::Object(map) => Ok(map),
        other => Err(InputError::NotAnObject(json_kind(&other))),
    }
}

/// Assemble, enrich and deliver one event.
pub async fn relay(
    cli: &Cli,
    payload: Map<String, Value>,
    client: &DeliveryClient,
) -> Result<(), RelayError> {
    let input = Value::Object(payload.clone());
    debug!(component = "relay", event = "relay.input", input = %input);

    let mut event = build_event(&cli.source_app, &cli.event_type, payload, now_millis());

    if cli.add_chat {
        attach_chat(&mut event);
    }

    if cli.summarize {
        if let Some(summary) = summary::summarize(&event).filter(|s| !s.is_empty()) {
            event.summary = Some(summary);
        }
    }

    debug!(
        component = "relay",
        event = "relay.sending",
        url = %cli.server_url,
        hook_event_type = %event.hook_event_type,
        session_id = %event.session_id,
        has_chat = event.chat.is_some(),
        summary = ?event.summary,
    );

    let delivery = client.send(&cli.server_url, &event).await?;
    if !delivery.is_success() {
        return Err(RelayError::Rejected {
            status: delivery.status,
            body: delivery.body,
        });
    }

    info!(
        component = "relay",
        event = "relay.delivered",
        hook_event_type = %event.hook_event_type,
        session_id = %event.session_id,
        "Event delivered"
    );
    Ok(())
}

/// Wrap a hook payload in an event envelope.
pub fn build_event(
    source_app: &str,
    event_type: &str,
    payload: Map<String, Value>,
    timestamp: i64,
) -> Event {
    let session_id = match payload.get("session_id") {
        None | Some(Value::Null) => UNKNOWN_SESSION_ID.to_string(),
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
    };

    Event {
        source_app: source_app.to_string(),
        session_id,
        hook_event_type: event_type.to_string(),
        payload: Value::Object(payload),
        timestamp,
        chat: None,
        summary: None,
    }
}

/// Attach the session transcript when the payload points at an existing file.
///
/// Read failures are logged and leave `chat` unset.
pub fn attach_chat(event: &mut Event) {
    let Some(path) = event.transcript_path().map(PathBuf::from) else {
        debug!(
            component = "relay",
            event = "relay.no_transcript",
            "No transcript_path in payload"
        );
        return;
    };

    if !path.exists() {
        debug!(
            component = "relay",
            event = "relay.transcript_missing",
            path = %path.display(),
        );
        return;
    }

    match transcript::load_chat(&path) {
        Ok(chat) => event.chat = Some(chat),
        Err(e) => warn!(
            component = "relay",
            event = "relay.transcript_failed",
            error = %e,
            "Failed to read transcript"
        ),
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
