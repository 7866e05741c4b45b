//! Logging utilities for the PerkOS CLI
//!
//! This module provides:
//! - Request ID generation and tracking
//! - Sensitive data redaction
//! - Performance timing spans
//! - Structured logging setup
//! - Multiple output formats (compact, full, JSON)

use crate::config::LogSettings;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};
use uuid::Uuid;

/// Global request ID for the current session
static REQUEST_ID: OnceLock<String> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Enable console output
    pub console: bool,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
    /// Include span close events, which carry timings
    pub span_events: bool,
    /// Module-based filtering
    pub module_filter: Option<HashMap<String, String>>,
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LogFormat {
    /// Compact format for production
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl LogFormat {
    fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "full" => Some(Self::Full),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            thread_ids: false,
            source_location: false,
            span_events: false,
            module_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from the number of `-v` flags
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let trace = verbosity >= 3;

        Self {
            level: level.to_string(),
            format: if trace { LogFormat::Full } else { LogFormat::Compact },
            source_location: verbosity >= 2,
            thread_ids: trace,
            span_events: trace,
            ..Self::default()
        }
    }

    /// Apply the config file's logging section
    pub fn merge_with_settings(&mut self, settings: &LogSettings) {
        if let Some(level) = &settings.level {
            self.level = level.clone();
        }
        if let Some(format) = settings.format.as_deref().and_then(LogFormat::parse) {
            self.format = format;
        }
        if !settings.modules.is_empty() {
            self.module_filter = Some(settings.modules.clone());
        }
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        // RUST_LOG takes precedence
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        // PERKOS_LOG_FORMAT
        if let Ok(format) = std::env::var("PERKOS_LOG_FORMAT") {
            match LogFormat::parse(&format) {
                Some(format) => self.format = format,
                None => eprintln!("Warning: Invalid log format: {}, using default", format),
            }
        }
    }
}

/// Initialize the global logging system
///
/// Events go to stderr so that stdout only carries command output.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = create_env_filter(&config)?;
    let ansi = config.console && std::io::stderr().is_terminal();
    let span_events = if config.span_events {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(config.thread_ids)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(span_events);

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Compact => base.with_ansi(ansi).compact().boxed(),
        LogFormat::Full => base.with_ansi(ansi).boxed(),
        LogFormat::Json => base.with_ansi(false).json().boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(layer).with(env_filter);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    let request_id = generate_request_id();
    REQUEST_ID
        .set(request_id.clone())
        .map_err(|_| Error::other("Request ID was already set"))?;

    tracing::info!(
        request_id = %request_id,
        format = ?config.format,
        level = %config.level,
        "Logging initialized"
    );

    Ok(())
}

/// Create environment filter based on configuration
fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    // Apply module-specific filters
    if let Some(module_filters) = &config.module_filter {
        for (module, level) in module_filters {
            filter = filter.add_directive(
                format!("{}={}", module, level)
                    .parse()
                    .map_err(|e| Error::other(format!("Invalid filter directive: {}", e)))?,
            );
        }
    }

    Ok(filter)
}

/// Generate a unique request ID for this session
pub fn generate_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

/// Get the current request ID
pub fn current_request_id() -> Option<&'static str> {
    REQUEST_ID.get().map(|s| s.as_str())
}

/// Create a span with request ID and timing
pub fn create_operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        request_id = current_request_id().unwrap_or("unknown"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

/// Sensitive data redaction utilities
pub mod redaction {
    use regex::Regex;
    use std::sync::OnceLock;

    static SECRET_REGEX: OnceLock<Regex> = OnceLock::new();
    static BEARER_REGEX: OnceLock<Regex> = OnceLock::new();

    fn secret_regex() -> &'static Regex {
        SECRET_REGEX.get_or_init(|| {
            Regex::new(
                r#"(?i)(private[_-]?key|api[_-]?key|secret|password)[=:\s]+['"]?([a-zA-Z0-9_.-]{3,})['"]?"#,
            )
            .expect("redaction pattern is valid")
        })
    }

    fn bearer_regex() -> &'static Regex {
        BEARER_REGEX.get_or_init(|| {
            Regex::new(r#"(?i)(bearer)\s+([a-zA-Z0-9_.=-]{10,})"#).expect("redaction pattern is valid")
        })
    }

    /// Redact sensitive information from a string
    pub fn redact_sensitive(input: &str) -> String {
        let result = secret_regex().replace_all(input, "$1=***");
        bearer_regex().replace_all(&result, "$1 ***").to_string()
    }

    /// Redact sensitive information from JSON values
    pub fn redact_json_value(value: &mut serde_json::Value) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    if is_sensitive_key(key) {
                        *val = serde_json::Value::String("***".to_string());
                    } else {
                        redact_json_value(val);
                    }
                }
            }
            serde_json::Value::Array(arr) => {
                for item in arr.iter_mut() {
                    redact_json_value(item);
                }
            }
            serde_json::Value::String(s) => {
                *s = redact_sensitive(s);
            }
            _ => {}
        }
    }

    /// Check if a JSON key names a secret
    ///
    /// Suffix matching keeps `keywords` and `tokenAddress` visible.
    fn is_sensitive_key(key: &str) -> bool {
        let key_lower = key.to_lowercase();
        key_lower.ends_with("key")
            || key_lower.ends_with("token")
            || key_lower.contains("password")
            || key_lower.contains("passwd")
            || key_lower.contains("secret")
            || key_lower.contains("credential")
            || key_lower == "authorization"
    }
}

/// Performance timing utilities
pub mod timing {
    use std::time::Instant;
    use tracing::span::EnteredSpan;

    /// Enters an operation span and records its duration when dropped
    pub struct Timer {
        start: Instant,
        span: EnteredSpan,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self::start(operation, None)
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self::start(operation, Some(details))
        }

        fn start(operation: &str, details: Option<&str>) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, details).entered(),
                operation: operation.to_string(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration_ms = self.start.elapsed().as_millis() as u64;
            self.span.record("duration_ms", duration_ms);
            tracing::debug!(operation = %self.operation, duration_ms, "Operation completed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redaction() {
        let input = "privateKey=0x59c6995e998f97a5a004 password: hunter22 Authorization: Bearer abcdefghijkl";
        let redacted = redaction::redact_sensitive(input);
        assert!(redacted.contains("privateKey=***"));
        assert!(redacted.contains("password=***"));
        assert!(redacted.contains("Bearer ***"));
        assert!(!redacted.contains("0x59c6995e998f97a5a004"));
        assert!(!redacted.contains("hunter22"));
        assert!(!redacted.contains("abcdefghijkl"));
    }

    #[test]
    fn test_json_redaction() {
        let mut value = json!({
            "envelope": {"signature": "0xabcdef"},
            "privateKey": "0x59c6995e998f97a5",
            "keywords": ["rust"],
            "tokenAddress": "0x0000000000000000000000000000000000000001",
            "headers": {
                "authorization": "Bearer token123"
            }
        });

        redaction::redact_json_value(&mut value);

        assert_eq!(value["privateKey"], "***");
        assert_eq!(value["headers"]["authorization"], "***");
        assert_eq!(value["keywords"], json!(["rust"]));
        assert_eq!(value["envelope"]["signature"], "0xabcdef");
        assert_eq!(
            value["tokenAddress"],
            "0x0000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_logging_config_from_verbosity() {
        let config = LoggingConfig::from_verbosity(0);
        assert_eq!(config.level, "warn");
        assert!(!config.source_location);

        let config = LoggingConfig::from_verbosity(2);
        assert_eq!(config.level, "debug");
        assert!(config.source_location);

        let config = LoggingConfig::from_verbosity(3);
        assert_eq!(config.level, "trace");
        assert!(config.thread_ids);
        assert!(config.span_events);
    }

    #[test]
    fn test_settings_override() {
        let mut config = LoggingConfig::from_verbosity(0);
        config.merge_with_settings(&LogSettings {
            level: Some("info".to_string()),
            format: Some("JSON".to_string()),
            modules: HashMap::from([("perkos_validators".to_string(), "trace".to_string())]),
        });
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);

        let filter = create_env_filter(&config).unwrap().to_string();
        assert!(filter.contains("perkos_validators=trace"));
    }

    #[test]
    fn test_request_id_shape() {
        let id = generate_request_id();
        assert!(id.starts_with("req_"));
        assert_eq!(id.len(), 4 + 32);
    }
}
