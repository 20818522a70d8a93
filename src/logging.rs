// ==========================================
// Logging setup
// ==========================================
// RUST_LOG          filter directives (default: scorte=info,warn)
// SCORTE_LOG_FORMAT "json" for JSON lines, anything else for text
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "SCORTE_LOG_FORMAT";

const DEFAULT_DIRECTIVES: &str = "scorte=info,warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber in the format chosen by `SCORTE_LOG_FORMAT`.
///
/// # Example
/// ```no_run
/// scorte::logging::init();
/// tracing::info!("ready");
/// ```
pub fn init() {
    init_with(LogFormat::from_env());
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_with(format: LogFormat) {
    let builder = fmt().with_env_filter(env_filter());
    let installed = match format {
        LogFormat::Text => builder.with_target(true).with_line_number(true).try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Debug-level subscriber writing through the test harness capture.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("scorte=debug"))
        .with_test_writer()
        .try_init();
}
