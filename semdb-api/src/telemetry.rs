//! Logging setup
//!
//! Filter precedence: `RUST_LOG`, then `LOG_LEVEL`, then the configured
//! default level.

use crate::config::{LogFormat, LoggingConfig};
use std::env;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Resolved logging settings
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Filter directive from the environment, empty if unset
    pub log_filter: String,
    /// Fallback level
    pub default_level: String,
    pub log_format: LogFormat,
}

impl TelemetryConfig {
    /// Combine the `[logging]` section with the environment
    pub fn from_config(logging: &LoggingConfig) -> Self {
        Self {
            log_filter: env::var("RUST_LOG")
                .or_else(|_| env::var("LOG_LEVEL"))
                .unwrap_or_default(),
            default_level: logging.level.clone(),
            log_format: match env::var("LOG_FORMAT")
                .map(|f| f.to_lowercase())
                .as_deref()
            {
                Ok("json") => LogFormat::Json,
                Ok("human") => LogFormat::Human,
                _ => logging.format,
            },
        }
    }
}

/// Initialize the global tracing subscriber
///
/// Safe to call multiple times - will only initialize once.
pub fn init_logging(config: &TelemetryConfig) {
    if tracing::dispatcher::has_been_set() {
        tracing::debug!("tracing subscriber already initialized, skipping");
        return;
    }

    let filter = if config.log_filter.is_empty() {
        EnvFilter::new(&config.default_level)
    } else {
        EnvFilter::new(&config.log_filter)
    };

    // try_init: another thread may have won the race since has_been_set()
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(config.log_format, std::io::stderr))
        .try_init();
}

/// Output layer for the chosen format
///
/// `Json` emits one object per event with span context; `Human` is the
/// compact single-line form.
pub fn fmt_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Human => tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
    }
}
