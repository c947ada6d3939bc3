//! Command line interface.
//!
//! Flags keep their historical single-dash spelling (`-url`, `-element`,
//! `-pushoverkey`, `-pushovertarget`). They are rewritten to clap's `--long`
//! form before parsing, so `--url` works as well.
//!
//! None of the flags is required by the parser. A missing flag parses as an
//! empty value and is reported by [`MonitorConfig::validate`].

use clap::{ArgAction, Parser};
use std::ffi::OsString;

use crate::config::{FetchConfig, MonitorConfig, NotifyConfig, PUSHOVER_API_URL};
use crate::observability::Verbosity;

/// Long flags that may be written with a single dash.
const LONG_FLAGS: &[&str] = &[
    "url",
    "element",
    "pushoverkey",
    "pushovertarget",
    "timeout-secs",
    "pushover-api",
    "strict-exit",
    "log-json",
    "verbose",
    "help",
    "version",
];

/// Check one element of a webpage and push its text to Pushover.
#[derive(Debug, Clone, Parser)]
#[command(name = "webpage-monitor", version, about)]
pub struct Args {
    /// URL of the webpage
    #[arg(long = "url", value_name = "URL", default_value = "")]
    pub url: String,

    /// CSS selector for the element
    #[arg(long = "element", value_name = "SELECTOR", default_value = "")]
    pub element: String,

    /// Pushover API key
    #[arg(
        long = "pushoverkey",
        env = "PUSHOVER_KEY",
        hide_env_values = true,
        default_value = ""
    )]
    pub pushover_key: String,

    /// Pushover user to target
    #[arg(
        long = "pushovertarget",
        env = "PUSHOVER_TARGET",
        hide_env_values = true,
        default_value = ""
    )]
    pub pushover_target: String,

    /// Give up on the page request after this many seconds (default: never)
    #[arg(long = "timeout-secs", value_name = "SECONDS")]
    pub timeout_secs: Option<f64>,

    /// Pushover message endpoint
    #[arg(long = "pushover-api", value_name = "URL", default_value = PUSHOVER_API_URL)]
    pub pushover_api: String,

    /// Exit non-zero when the run fails (1 fetch, 2 extract, 3 delivery)
    #[arg(long = "strict-exit")]
    pub strict_exit: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Log as JSON lines
    #[arg(long = "log-json")]
    pub log_json: bool,
}

impl Args {
    /// Parses the process arguments, exiting on usage errors.
    #[must_use]
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Parses `args` (including the program name).
    pub fn try_parse_normalized_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// Log verbosity requested on the command line.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from(self.verbose)
    }

    /// Builds the run configuration.
    #[must_use]
    pub fn into_config(self) -> MonitorConfig {
        let mut fetch = FetchConfig::new();
        if let Some(secs) = self.timeout_secs {
            fetch = fetch.with_timeout(secs);
        }
        let notify = NotifyConfig::new(self.pushover_key, self.pushover_target)
            .with_api_url(self.pushover_api);

        MonitorConfig::new(self.url, self.element, notify)
            .with_fetch(fetch)
            .with_strict_exit(self.strict_exit)
    }
}

/// Rewrites `-flag` and `-flag=value` to `--flag` forms for known long flags.
///
/// The program name is left alone, as is everything after a bare `--`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for (index, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if index == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        out.push(normalize_one(arg));
    }
    out
}

fn normalize_one(arg: OsString) -> OsString {
    let Some(text) = arg.to_str() else {
        return arg;
    };
    let Some(rest) = text.strip_prefix('-') else {
        return arg;
    };
    if rest.starts_with('-') {
        return arg;
    }

    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    if LONG_FLAGS.contains(&name) {
        OsString::from(format!("-{text}"))
    } else {
        arg
    }
}
