//! Structured logging initialization via `tracing`.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Output format of the tracing subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Build the filter: `RUST_LOG` when set, `level` otherwise.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize the tracing subscriber.
///
/// Respects the `RUST_LOG` environment variable for filtering, falling back
/// to `level`. Calling it again after a subscriber is installed does nothing.
pub fn init_tracing(level: &str, format: LogFormat) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(level));
    let result = match format {
        LogFormat::Human => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(e) = result {
        tracing::debug!("tracing already initialized: {e}");
    }
}
