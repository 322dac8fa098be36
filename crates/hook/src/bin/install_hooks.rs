//! `install-hooks` — register `send-event` as Claude Code hooks.
//!
//! Safely merges hook entries into `~/.claude/settings.json` (or the file
//! given with `--settings`).

use std::path::PathBuf;

use anyhow::Context;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use hookcast::settings::{self, HookTarget};

#[derive(Debug, Parser)]
#[command(
    name = "install-hooks",
    version,
    about = "Register send-event in Claude Code settings.json"
)]
struct Args {
    /// Source application name reported with every event
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    source_app: String,

    /// Settings file to update (default: ~/.claude/settings.json)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Collector URL baked into the hook commands
    #[arg(long, env = "HOOKCAST_SERVER_URL")]
    server_url: Option<String>,

    /// Path to the send-event binary (default: next to this binary)
    #[arg(long)]
    send_event: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings_file = match args.settings {
        Some(path) => path,
        None => dirs::home_dir()
            .context("HOME not found")?
            .join(".claude/settings.json"),
    };

    let send_event = match args.send_event {
        Some(path) => path,
        None => std::env::current_exe()
            .context("cannot locate install-hooks binary")?
            .with_file_name(format!("send-event{}", std::env::consts::EXE_SUFFIX)),
    };
    if !send_event.exists() {
        anyhow::bail!(
            "send-event not found at {}. Pass --send-event <path>.",
            send_event.display()
        );
    }

    let target = HookTarget {
        send_event,
        source_app: args.source_app,
        server_url: args.server_url,
    };

    let existed = settings_file.exists();
    let report = settings::install(&settings_file, &target)
        .with_context(|| format!("failed to update {}", settings_file.display()))?;

    println!();
    println!("  hookcast v{}", hookcast::VERSION);
    if existed {
        println!(
            "  Backed up {} → {}",
            settings_file.display(),
            settings::backup_path(&settings_file).display()
        );
    }
    if !report.added.is_empty() {
        println!("  Added {} hook(s):", report.added.len());
        for h in &report.added {
            println!("    + {}", h);
        }
    }
    if !report.updated.is_empty() {
        println!("  Updated {} hook(s):", report.updated.len());
        for h in &report.updated {
            println!("    ~ {}", h);
        }
    }
    println!();
    println!("  Settings written to {}", settings_file.display());
    println!();

    Ok(())
}
