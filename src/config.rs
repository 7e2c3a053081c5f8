use std::time::Duration;

use clap::{Parser, ValueEnum};

// constants (used as defaults)

/// Maximum number of redirect hops to follow per trace.
/// Prevents infinite redirect loops and excessive request chains.
pub const MAX_REDIRECT_HOPS: usize = 20;

/// Per-hop request timeout in seconds.
/// Each hop is an independent request; the timeout applies to each one
/// separately, never to the trace as a whole.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum URL length (2048 characters) to prevent abuse via extremely long URLs.
/// This matches common browser and server limits (e.g., IE, Apache, Nginx default limits).
pub const MAX_URL_LENGTH: usize = 2048;

/// Default User-Agent string for outbound hop requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str = "Redirect-Monitor/1.0";

/// Default address the API server binds to.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1";

/// Default port the API server binds to.
pub const DEFAULT_PORT: u16 = 8080;

/// Interval in seconds between progress log lines while the server runs.
pub const LOGGING_INTERVAL_SECS: u64 = 60;

// Captured response headers
// These headers are copied into each step record; everything else is dropped.
pub const HEADER_LOCATION: &str = "Location";
pub const HEADER_SERVER: &str = "Server";
pub const HEADER_CACHE_CONTROL: &str = "Cache-Control";

/// List of response headers captured into each step record.
///
/// `Location` drives the chain itself; `Server` and `Cache-Control` are the
/// headers the renderer displays per hop. To add/remove headers, modify this
/// array. Capture is case-insensitive; output uses these canonical names.
pub const CAPTURED_HEADERS: &[&str] = &[HEADER_LOCATION, HEADER_SERVER, HEADER_CACHE_CONTROL];

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace). Used with the `--log-level` CLI option.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Command-line options and configuration.
///
/// This struct is automatically generated by `clap` from the field attributes.
/// All options have sensible defaults and can be overridden via command-line flags.
///
/// # Examples
///
/// ```bash
/// # Serve the JSON API on the default address (127.0.0.1:8080)
/// redirect_monitor
///
/// # Trace a single URL and print the result as JSON
/// redirect_monitor example.com
///
/// # Tighter limits
/// redirect_monitor --max-hops 5 --timeout-seconds 10
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "redirect_monitor",
    about = "Traces the redirect chain of a URL and reports every hop."
)]
pub struct Config {
    /// URL to trace once; when omitted, the HTTP API server is started instead
    #[arg(value_parser)]
    pub url: Option<String>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Address the API server binds to
    #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: String,

    /// Port the API server binds to
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum number of redirect hops per trace
    #[arg(long, default_value_t = MAX_REDIRECT_HOPS)]
    pub max_hops: usize,

    /// Per-hop timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value for outbound hop requests
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Config {
    /// Per-hop timeout as a `Duration`.
    pub fn per_hop_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            listen: DEFAULT_LISTEN_ADDR.to_string(),
            port: DEFAULT_PORT,
            max_hops: MAX_REDIRECT_HOPS,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = Config::parse_from(["redirect_monitor"]);
        assert_eq!(config.url, None);
        assert_eq!(config.listen, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_hops, MAX_REDIRECT_HOPS);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_positional_url_and_overrides() {
        let config = Config::parse_from([
            "redirect_monitor",
            "example.com",
            "--max-hops",
            "5",
            "--timeout-seconds",
            "10",
            "--log-level",
            "debug",
        ]);
        assert_eq!(config.url.as_deref(), Some("example.com"));
        assert_eq!(config.max_hops, 5);
        assert_eq!(config.per_hop_timeout(), Duration::from_secs(10));
        assert_eq!(
            log::LevelFilter::from(config.log_level),
            log::LevelFilter::Debug
        );
    }

    #[test]
    fn test_default_impl_agrees_with_clap_defaults() {
        let parsed = Config::parse_from(["redirect_monitor"]);
        let built = Config::default();
        assert_eq!(parsed.listen, built.listen);
        assert_eq!(parsed.port, built.port);
        assert_eq!(parsed.max_hops, built.max_hops);
        assert_eq!(parsed.timeout_seconds, built.timeout_seconds);
        assert_eq!(parsed.user_agent, built.user_agent);
    }

    #[test]
    fn test_captured_headers_contains_location() {
        // The chain cannot be followed without the Location header
        assert!(CAPTURED_HEADERS.contains(&HEADER_LOCATION));
    }
}
