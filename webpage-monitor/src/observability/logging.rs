//! Log subscriber setup for the binary.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How much the monitor logs about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Values and errors.
    Info,
    /// Step progress, response statuses.
    Debug,
    /// Everything.
    Trace,
}

impl From<u8> for Verbosity {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::Info,
            1 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl From<Verbosity> for Level {
    fn from(v: Verbosity) -> Self {
        match v {
            Verbosity::Info => Self::INFO,
            Verbosity::Debug => Self::DEBUG,
            Verbosity::Trace => Self::TRACE,
        }
    }
}

/// Filter directives for `verbosity`; other crates stay at `warn`.
#[must_use]
pub fn default_directives(verbosity: Verbosity) -> String {
    let level: Level = verbosity.into();
    format!("warn,webpage_monitor={}", level.as_str().to_ascii_lowercase())
}

/// Installs the global subscriber writing to stderr.
///
/// `RUST_LOG`, when set, replaces the directives derived from `verbosity`.
/// Fails if a global subscriber is already installed; callers may carry on
/// without logging.
pub fn init_logging(verbosity: Verbosity, json: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}
