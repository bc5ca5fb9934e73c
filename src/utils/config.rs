use std::env;
use std::time::Duration;

/// Server configuration - immutable after load
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub starting_credits: u32,
    pub reveal_cadence_ms: u64,
    /// Abort a running match playback when the player leaves battle mode
    pub cancel_on_navigate: bool,
    pub session_idle_timeout_secs: u64,
    pub cleanup_interval_secs: u64,

    // Event source (Gemini)
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub request_timeout_secs: Option<u64>,

    // Logging
    pub log_file: String,
    pub log_level: log::LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 8080,
            starting_credits: 2500,
            reveal_cadence_ms: 1500,
            cancel_on_navigate: false,
            session_idle_timeout_secs: 1800,
            cleanup_interval_secs: 60,
            gemini_api_key: None,
            gemini_model: "gemini-3-flash-preview".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            request_timeout_secs: None,
            log_file: "ignite.log".to_string(),
            log_level: log::LevelFilter::Debug,
        }
    }
}

impl Config {
    /// Defaults overlaid with `IGNITE_*` variables. The API credential comes
    /// from `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("IGNITE_HTTP_PORT").and_then(|v| v.parse().ok()) {
            config.http_port = port;
        }
        if let Some(credits) = lookup("IGNITE_STARTING_CREDITS").and_then(|v| v.parse().ok()) {
            config.starting_credits = credits;
        }
        if let Some(ms) = lookup("IGNITE_REVEAL_CADENCE_MS").and_then(|v| v.parse().ok()) {
            config.reveal_cadence_ms = ms;
        }
        if let Some(flag) = lookup("IGNITE_CANCEL_ON_NAVIGATE").and_then(|v| parse_flag(&v)) {
            config.cancel_on_navigate = flag;
        }
        if let Some(secs) = lookup("IGNITE_SESSION_IDLE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.session_idle_timeout_secs = secs;
        }
        if let Some(secs) = lookup("IGNITE_CLEANUP_INTERVAL_SECS").and_then(|v| v.parse().ok()) {
            config.cleanup_interval_secs = secs;
        }

        let key = |name: &str| lookup(name).filter(|key| !key.trim().is_empty());
        config.gemini_api_key = key("GEMINI_API_KEY").or_else(|| key("API_KEY"));
        if let Some(model) = lookup("IGNITE_GEMINI_MODEL") {
            config.gemini_model = model;
        }
        if let Some(url) = lookup("IGNITE_GEMINI_BASE_URL") {
            config.gemini_base_url = url;
        }
        config.request_timeout_secs = lookup("IGNITE_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0);

        if let Some(path) = lookup("IGNITE_LOG_FILE") {
            config.log_file = path;
        }
        if let Some(level) = lookup("IGNITE_LOG_LEVEL").and_then(|v| v.parse().ok()) {
            config.log_level = level;
        }

        config
    }

    pub fn reveal_cadence(&self) -> Duration {
        Duration::from_millis(self.reveal_cadence_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
