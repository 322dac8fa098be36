use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_FILTER: &str = "warn";
const DEBUG_FILTER: &str = "debug,hyper=info,hyper_util=info,reqwest=info";
const LOG_FILE_NAME: &str = "hooks.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the file writer flushing until the hook exits.
pub struct LoggingHandle {
    pub log_path: Option<PathBuf>,
    pub guard: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// Console output always goes to stderr; stdout is read by Claude Code. A log
/// directory that cannot be used only disables the file layer.
pub fn init_logging(debug: bool) -> anyhow::Result<LoggingHandle> {
    let directives = filter_directives(
        debug,
        std::env::var("HOOKCAST_LOG_FILTER").ok(),
        std::env::var("RUST_LOG").ok(),
    );
    let filter = EnvFilter::try_new(&directives)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    let format = std::env::var("HOOKCAST_LOG_FORMAT").unwrap_or_else(|_| "compact".into());
    let mut layers: Vec<BoxedLayer> = vec![console_layer(&format)];

    let mut log_path = None;
    let mut guard = None;
    let mut file_error = None;
    if let Ok(dir) = std::env::var("HOOKCAST_LOG_DIR") {
        let log_dir = PathBuf::from(dir);
        match file_layer(&log_dir) {
            Ok((layer, worker_guard)) => {
                layers.push(layer);
                log_path = Some(log_dir.join(LOG_FILE_NAME));
                guard = Some(worker_guard);
            }
            Err(e) => file_error = Some((log_dir, e)),
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    if let Some((log_dir, error)) = file_error {
        tracing::warn!(
            component = "logging",
            event = "logging.file_disabled",
            log_dir = %log_dir.display(),
            error = %error,
            "Log directory unusable, logging to stderr only"
        );
    }

    tracing::debug!(
        component = "logging",
        event = "logging.initialized",
        log_path = ?log_path,
        format = %format,
        filter = %directives,
    );

    Ok(LoggingHandle { log_path, guard })
}

/// `HOOKCAST_LOG_FILTER` always wins; `--debug` beats `RUST_LOG`.
fn filter_directives(
    debug: bool,
    hookcast_filter: Option<String>,
    rust_log: Option<String>,
) -> String {
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    if let Some(filter) = non_empty(hookcast_filter) {
        return filter;
    }
    if debug {
        return DEBUG_FILTER.to_string();
    }
    non_empty(rust_log).unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn file_layer(log_dir: &Path) -> std::io::Result<(BoxedLayer, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, worker_guard) = tracing_appender::non_blocking(file_appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .json()
        .flatten_event(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .boxed();
    Ok((layer, worker_guard))
}

fn default_filter(debug: bool) -> &'static str {
    if debug {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    }
}

fn console_layer(format: &str) -> BoxedLayer {
    let layer = fmt::layer().with_writer(std::io::stderr);
    if format.eq_ignore_ascii_case("json") {
        layer.json().flatten_event(true).boxed()
    } else if format.eq_ignore_ascii_case("pretty") {
        layer
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        layer.compact().with_target(false).boxed()
    }
}
