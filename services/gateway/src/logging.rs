use crate::config::{LogFormat, LogLevel};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError};

/// Initialize structured logging to stdout.
///
/// Uses `RUST_LOG` if set, otherwise `level`. Audit records arrive on the
/// `audit` target and can be filtered separately, e.g. `RUST_LOG=warn,audit=info`.
pub fn init_logging(level: LogLevel, format: LogFormat) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_target(true)
                    .with_ansi(false),
            )
            .try_init(),
        LogFormat::Text => registry.with(fmt::layer().with_target(true)).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_as_str_is_valid_env_filter() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert!(EnvFilter::try_new(level.as_str()).is_ok());
        }
    }
}
