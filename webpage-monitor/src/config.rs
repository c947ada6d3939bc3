//! Configuration types for a monitor run.
//!
//! A [`MonitorConfig`] is built once at startup and handed by reference to the
//! components that need it. Nothing mutates it during a run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ConfigError;

/// User agent sent with every page request.
pub const USER_AGENT: &str = concat!(
    "rust:webpage-monitor:v",
    env!("CARGO_PKG_VERSION"),
    " (by /u/Poo-Poo-Kitty)"
);

/// Public Pushover message endpoint.
pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Title used when reporting the element value.
pub const CHANGE_TITLE: &str = "Webpage Monitor change";

/// Title used when reporting an extraction error.
pub const ERROR_TITLE: &str = "Webpage Monitor error";

/// Configuration for the page fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds. `None` waits forever.
    #[serde(default)]
    pub timeout_seconds: Option<f64>,
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_seconds: None,
        }
    }
}

impl FetchConfig {
    /// Creates a new fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Gets the timeout as a `Duration`, if one is set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64)
    }
}

/// Configuration for the Pushover notifier.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Application API token.
    pub api_key: String,
    /// User or group key receiving the message.
    pub recipient: String,
    /// Message endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Title for value notifications.
    #[serde(default = "default_change_title")]
    pub change_title: String,
    /// Title for error notifications.
    #[serde(default = "default_error_title")]
    pub error_title: String,
}

fn default_api_url() -> String {
    PUSHOVER_API_URL.to_string()
}

fn default_change_title() -> String {
    CHANGE_TITLE.to_string()
}

fn default_error_title() -> String {
    ERROR_TITLE.to_string()
}

impl NotifyConfig {
    /// Creates a notifier configuration for the given credentials.
    #[must_use]
    pub fn new(api_key: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            recipient: recipient.into(),
            api_url: default_api_url(),
            change_title: default_change_title(),
            error_title: default_error_title(),
        }
    }

    /// Overrides the message endpoint.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

// Keeps the API token out of logs.
impl std::fmt::Debug for NotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyConfig")
            .field("api_key", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("api_url", &self.api_url)
            .field("change_title", &self.change_title)
            .field("error_title", &self.error_title)
            .finish()
    }
}

/// Everything one monitor run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Page to fetch.
    pub url: String,
    /// CSS selector of the watched element.
    pub selector: String,
    /// Fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Notification settings.
    pub notify: NotifyConfig,
    /// Map failures to non-zero exit codes.
    #[serde(default)]
    pub strict_exit: bool,
}

impl MonitorConfig {
    /// Creates a configuration with default fetch settings.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        selector: impl Into<String>,
        notify: NotifyConfig,
    ) -> Self {
        Self {
            url: url.into(),
            selector: selector.into(),
            fetch: FetchConfig::default(),
            notify,
            strict_exit: false,
        }
    }

    /// Replaces the fetch settings.
    #[must_use]
    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Enables or disables strict exit codes.
    #[must_use]
    pub fn with_strict_exit(mut self, strict: bool) -> Self {
        self.strict_exit = strict;
        self
    }

    /// Checks that every required value is present.
    ///
    /// Only presence is checked. URL syntax, selector syntax and token format
    /// are left to the step that uses them so the failure is reported there.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("-url", &self.url),
            ("-element", &self.selector),
            ("-pushoverkey", &self.notify.api_key),
            ("-pushovertarget", &self.notify.recipient),
        ];
        for (flag, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::missing(flag));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MonitorConfig {
        MonitorConfig::new(
            "https://example.com/item",
            "#price",
            NotifyConfig::new("a".repeat(30), "u".repeat(30)),
        )
    }

    #[test]
    fn test_defaults() {
        let config = sample();
        assert_eq!(config.fetch.user_agent, USER_AGENT);
        assert!(config.fetch.timeout().is_none());
        assert_eq!(config.notify.api_url, PUSHOVER_API_URL);
        assert_eq!(config.notify.change_title, "Webpage Monitor change");
        assert_eq!(config.notify.error_title, "Webpage Monitor error");
        assert!(!config.strict_exit);
    }

    #[test]
    fn test_user_agent_identifies_tool() {
        assert!(USER_AGENT.starts_with("rust:webpage-monitor:v"));
        assert!(USER_AGENT.ends_with("(by /u/Poo-Poo-Kitty)"));
    }

    #[test]
    fn test_timeout_ignores_non_positive() {
        assert_eq!(
            FetchConfig::new().with_timeout(2.5).timeout(),
            Some(Duration::from_millis(2500))
        );
        assert!(FetchConfig::new().with_timeout(0.0).timeout().is_none());
        assert!(FetchConfig::new().with_timeout(f64::NAN).timeout().is_none());
    }

    #[test]
    fn test_validate_reports_first_missing_flag() {
        assert!(sample().validate().is_ok());

        let mut config = sample();
        config.selector = String::new();
        assert_eq!(config.validate().unwrap_err().field, "-element");

        let mut config = sample();
        config.notify.recipient = "  ".to_string();
        assert_eq!(config.validate().unwrap_err().field, "-pushovertarget");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", sample().notify);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&"a".repeat(30)));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: MonitorConfig = serde_json::from_value(serde_json::json!({
            "url": "https://example.com",
            "selector": "h1",
            "notify": { "api_key": "k", "recipient": "r" }
        }))
        .unwrap();
        assert_eq!(config.fetch, FetchConfig::default());
        assert_eq!(config.notify.api_url, PUSHOVER_API_URL);
        assert!(!config.strict_exit);
    }
}
