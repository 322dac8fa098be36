//! Claude Code `settings.json` hook registration.
//!
//! Merges one `send-event` command per hook type into the `hooks` section.
//! Entries owned by other tools are left alone; our own entries are replaced
//! in place so repeated installs never duplicate.

use std::path::{Path, PathBuf};

use hookcast_protocol::hook_types;
use serde_json::{json, Value};
use thiserror::Error;

/// Hook types we register for, with the extra flags each one gets.
const HOOK_TYPES: &[(&str, &str)] = &[
    (hook_types::PRE_TOOL_USE, "--summarize"),
    (hook_types::POST_TOOL_USE, "--summarize"),
    (hook_types::USER_PROMPT_SUBMIT, "--summarize"),
    (hook_types::NOTIFICATION, "--summarize"),
    (hook_types::STOP, "--add-chat --summarize"),
    (hook_types::SUBAGENT_STOP, "--summarize"),
];

/// Marker used to recognise commands we installed.
const COMMAND_MARKER: &str = "send-event";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings.json is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings.json '{0}' is not an object")]
    NotAnObject(String),
}

/// What the generated hook commands look like
#[derive(Debug, Clone)]
pub struct HookTarget {
    pub send_event: PathBuf,
    pub source_app: String,
    pub server_url: Option<String>,
}

impl HookTarget {
    /// Shell command Claude Code runs for `hook_type`.
    pub fn command(&self, hook_type: &str, extra_flags: &str) -> String {
        let mut command = format!(
            "{} --source-app {} --event-type {}",
            shell_quote(&self.send_event.to_string_lossy()),
            shell_quote(&self.source_app),
            hook_type,
        );
        if let Some(url) = &self.server_url {
            command.push_str(" --server-url ");
            command.push_str(&shell_quote(url));
        }
        if !extra_flags.is_empty() {
            command.push(' ');
            command.push_str(extra_flags);
        }
        command
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: Vec<&'static str>,
    pub updated: Vec<&'static str>,
}

/// Merge our hook entries into an already-parsed settings document.
pub fn merge_hooks(settings: &mut Value, target: &HookTarget) -> Result<MergeReport, SettingsError> {
    let obj = settings
        .as_object_mut()
        .ok_or_else(|| SettingsError::NotAnObject("<root>".to_string()))?;

    let hooks_map = obj
        .entry("hooks")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| SettingsError::NotAnObject("hooks".to_string()))?;

    let mut report = MergeReport::default();

    for &(hook_type, flags) in HOOK_TYPES {
        let hook_entry = json!({
            "matcher": "",
            "hooks": [{
                "type": "command",
                "command": target.command(hook_type, flags),
            }]
        });

        match hooks_map.get_mut(hook_type) {
            Some(Value::Array(arr)) => {
                if let Some(idx) = arr.iter().position(is_our_entry) {
                    arr[idx] = hook_entry;
                    report.updated.push(hook_type);
                } else {
                    arr.push(hook_entry);
                    report.added.push(hook_type);
                }
            }
            Some(_) => return Err(SettingsError::NotAnObject(format!("hooks.{hook_type}"))),
            None => {
                hooks_map.insert(hook_type.to_string(), json!([hook_entry]));
                report.added.push(hook_type);
            }
        }
    }

    Ok(report)
}

/// Install hooks into the settings file at `path`.
///
/// A missing file starts from `{}`. An existing file is backed up to
/// `settings.json.bak` before being rewritten.
pub fn install(path: &Path, target: &HookTarget) -> Result<MergeReport, SettingsError> {
    let io_err = |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut settings = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(io_err)?;
        serde_json::from_str::<Value>(&content)?
    } else {
        json!({})
    };

    let report = merge_hooks(&mut settings, target)?;

    if path.exists() {
        std::fs::copy(path, backup_path(path)).map_err(io_err)?;
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let formatted = serde_json::to_string_pretty(&settings)?;
    std::fs::write(path, formatted).map_err(io_err)?;

    Ok(report)
}

pub fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("json.bak")
}

fn is_our_entry(entry: &Value) -> bool {
    let is_ours = |command: Option<&Value>| {
        command
            .and_then(Value::as_str)
            .map(|c| c.contains(COMMAND_MARKER))
            .unwrap_or(false)
    };

    // Nested format: entry.hooks[].command
    if let Some(hooks) = entry.get("hooks").and_then(Value::as_array) {
        return hooks.iter().any(|h| is_ours(h.get("command")));
    }
    // Bare format: entry.command
    is_ours(entry.get("command"))
}

fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> HookTarget {
        HookTarget {
            send_event: PathBuf::from("/usr/local/bin/send-event"),
            source_app: "my-project".to_string(),
            server_url: None,
        }
    }

    fn commands_for(settings: &Value, hook_type: &str) -> Vec<String> {
        settings["hooks"][hook_type]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|entry| entry["hooks"].as_array().unwrap().clone())
            .map(|h| h["command"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn builds_commands_with_flags() {
        assert_eq!(
            target().command("Stop", "--add-chat --summarize"),
            "/usr/local/bin/send-event --source-app my-project --event-type Stop --add-chat --summarize"
        );

        let remote = HookTarget {
            send_event: PathBuf::from("/opt/my tools/send-event"),
            source_app: "it's mine".to_string(),
            server_url: Some("http://collector:4000/events".to_string()),
        };
        assert_eq!(
            remote.command("PreToolUse", ""),
            r"'/opt/my tools/send-event' --source-app 'it'\''s mine' --event-type PreToolUse --server-url http://collector:4000/events"
        );
    }

    #[test]
    fn merges_into_empty_settings() {
        let mut settings = json!({});
        let report = merge_hooks(&mut settings, &target()).unwrap();

        assert_eq!(report.added.len(), HOOK_TYPES.len());
        assert!(report.updated.is_empty());
        assert_eq!(
            commands_for(&settings, "Stop"),
            vec!["/usr/local/bin/send-event --source-app my-project --event-type Stop --add-chat --summarize"]
        );
    }

    #[test]
    fn second_merge_updates_instead_of_duplicating() {
        let mut settings = json!({});
        merge_hooks(&mut settings, &target()).unwrap();

        let mut renamed = target();
        renamed.source_app = "renamed".to_string();
        let report = merge_hooks(&mut settings, &renamed).unwrap();

        assert!(report.added.is_empty());
        assert_eq!(report.updated.len(), HOOK_TYPES.len());
        let commands = commands_for(&settings, "PreToolUse");
        assert_eq!(commands.len(), 1);
        assert!(commands[0].contains("--source-app renamed"));
    }

    #[test]
    fn keeps_foreign_hooks_and_other_settings() {
        let mut settings = json!({
            "model": "opus",
            "hooks": {
                "PreToolUse": [
                    {"matcher": "Bash", "hooks": [{"type": "command", "command": "audit.sh"}]}
                ]
            }
        });
        let report = merge_hooks(&mut settings, &target()).unwrap();

        assert!(report.added.contains(&"PreToolUse"));
        assert_eq!(settings["model"], "opus");
        let commands = commands_for(&settings, "PreToolUse");
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], "audit.sh");
    }

    #[test]
    fn replaces_bare_legacy_entries() {
        let mut settings = json!({
            "hooks": {"Notification": [{"type": "command", "command": "send-event --source-app old"}]}
        });
        let report = merge_hooks(&mut settings, &target()).unwrap();
        assert!(report.updated.contains(&"Notification"));
        assert_eq!(settings["hooks"]["Notification"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn rejects_non_object_sections() {
        let mut settings = json!({"hooks": []});
        assert!(matches!(
            merge_hooks(&mut settings, &target()),
            Err(SettingsError::NotAnObject(key)) if key == "hooks"
        ));

        let mut settings = json!({"hooks": {"Stop": "nope"}});
        assert!(merge_hooks(&mut settings, &target()).is_err());
    }

    #[test]
    fn install_writes_file_and_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".claude").join("settings.json");

        let report = install(&path, &target()).unwrap();
        assert_eq!(report.added.len(), HOOK_TYPES.len());
        assert!(!backup_path(&path).exists());

        install(&path, &target()).unwrap();
        assert!(backup_path(&path).exists());

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(commands_for(&written, "SubagentStop").len(), 1);
    }

    #[test]
    fn install_refuses_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{oops").unwrap();

        assert!(matches!(
            install(&path, &target()),
            Err(SettingsError::Json(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{oops");
    }
}
