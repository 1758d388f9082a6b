//! Bridge configuration

use std::ffi::OsString;

use crate::logging::LogConfig;

#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
    /// Logging to initialise at install time (`None` leaves it to the embedder)
    pub log: Option<LogConfig>,
    /// Emit a TRACE event for every slot dispatch
    pub trace_dispatch: bool,
}

impl BridgeConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let log = log_requested(std::env::vars_os().map(|(key, _)| key))
            .then(LogConfig::from_env);

        // SLOTBRIDGE_TRACE_DISPATCH: 1/true enables per-dispatch events
        let trace_dispatch = std::env::var("SLOTBRIDGE_TRACE_DISPATCH")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self { log, trace_dispatch }
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = Some(log);
        self
    }

    pub fn with_trace_dispatch(mut self, enabled: bool) -> Self {
        self.trace_dispatch = enabled;
        self
    }
}

/// Any `SLOTBRIDGE_LOG_*` variable turns logging on
fn log_requested<I>(keys: I) -> bool
where
    I: IntoIterator<Item = OsString>,
{
    keys.into_iter()
        .any(|key| key.to_str().map_or(false, |k| k.starts_with(LOG_ENV_PREFIX)))
}

const LOG_ENV_PREFIX: &str = "SLOTBRIDGE_LOG_";
