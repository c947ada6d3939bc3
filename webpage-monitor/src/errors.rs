//! Error types for the webpage monitor.
//!
//! Every pipeline step has its own error struct carrying a kind tag, a
//! contextual message and an optional wrapped cause. The display form is the
//! message followed by `: <cause>` when a cause is present, so a logged error
//! reads as one line naming the failed operation and its input.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A boxed underlying cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn cause_suffix(source: Option<&(dyn std::error::Error + Send + Sync + 'static)>) -> String {
    source.map(|cause| format!(": {cause}")).unwrap_or_default()
}

/// The main error type for webpage monitor operations.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Fetching the page failed.
    #[error("{0}")]
    Fetch(#[from] FetchError),

    /// Extracting the element value failed.
    #[error("{0}")]
    Extract(#[from] ExtractError),

    /// Sending the notification failed.
    #[error("{0}")]
    Delivery(#[from] DeliveryError),

    /// The run configuration is incomplete.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// What went wrong while fetching a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// The request could not be built (malformed URL, bad header).
    InvalidRequest,
    /// The request was sent but the network call failed.
    Network,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// Error raised by the page fetcher.
#[derive(Debug, Error)]
#[error("{message}{}", cause_suffix(.source.as_deref()))]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
    source: Option<BoxError>,
}

impl FetchError {
    /// Creates a fetch error with no underlying cause.
    #[must_use]
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Request construction failed for `url`.
    pub fn invalid_request(url: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(
            FetchErrorKind::InvalidRequest,
            format!("failed to create request to {url:?}"),
        )
        .with_source(cause)
    }

    /// The network call to `url` failed.
    pub fn network(url: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(
            FetchErrorKind::Network,
            format!("failed to make request to {url:?}"),
        )
        .with_source(cause)
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(mut self, cause: impl Into<BoxError>) -> Self {
        self.source = Some(cause.into());
        self
    }

    /// Returns the error kind.
    #[must_use]
    pub fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    /// Returns the contextual message without the cause.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// What went wrong while extracting an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractErrorKind {
    /// The page body could not be read into a document.
    Parse,
    /// The selector string is not a valid CSS selector.
    ///
    /// Earlier releases matched nothing for such a selector and reported
    /// [`ExtractErrorKind::NotFound`].
    InvalidSelector,
    /// No element matched the selector.
    NotFound,
}

impl fmt::Display for ExtractErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "parse"),
            Self::InvalidSelector => write!(f, "invalid_selector"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}

/// Error raised by the element extractor.
#[derive(Debug, Error)]
#[error("{message}{}", cause_suffix(.source.as_deref()))]
pub struct ExtractError {
    kind: ExtractErrorKind,
    message: String,
    source: Option<BoxError>,
}

impl ExtractError {
    /// Creates an extract error with no underlying cause.
    #[must_use]
    pub fn new(kind: ExtractErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// The document could not be created from the page body.
    pub fn parse(cause: impl Into<BoxError>) -> Self {
        Self::new(ExtractErrorKind::Parse, "failed to create document").with_source(cause)
    }

    /// The selector failed to compile.
    #[must_use]
    pub fn invalid_selector(selector: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ExtractErrorKind::InvalidSelector,
            format!("invalid selector {selector:?}: {}", reason.into()),
        )
    }

    /// Nothing in the document matched `selector`.
    #[must_use]
    pub fn not_found(selector: &str) -> Self {
        Self::new(
            ExtractErrorKind::NotFound,
            format!("unable to find {selector:?} in document"),
        )
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(mut self, cause: impl Into<BoxError>) -> Self {
        self.source = Some(cause.into());
        self
    }

    /// Returns the error kind.
    #[must_use]
    pub fn kind(&self) -> ExtractErrorKind {
        self.kind
    }

    /// Returns the contextual message without the cause.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// What went wrong while delivering a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryErrorKind {
    /// The API token is empty or malformed.
    InvalidToken,
    /// The recipient identifier is empty or malformed.
    InvalidRecipient,
    /// The message body or title breaks the service limits.
    InvalidMessage,
    /// The service answered but refused the message.
    Rejected,
    /// The network call to the service failed.
    Network,
}

impl fmt::Display for DeliveryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid_token"),
            Self::InvalidRecipient => write!(f, "invalid_recipient"),
            Self::InvalidMessage => write!(f, "invalid_message"),
            Self::Rejected => write!(f, "rejected"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// Error raised by a notifier.
#[derive(Debug, Error)]
#[error("{message}{}", cause_suffix(.source.as_deref()))]
pub struct DeliveryError {
    kind: DeliveryErrorKind,
    message: String,
    source: Option<BoxError>,
}

impl DeliveryError {
    /// Creates a delivery error with no underlying cause.
    #[must_use]
    pub fn new(kind: DeliveryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// The service could not be reached.
    pub fn network(cause: impl Into<BoxError>) -> Self {
        Self::new(DeliveryErrorKind::Network, "failed to send message").with_source(cause)
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(mut self, cause: impl Into<BoxError>) -> Self {
        self.source = Some(cause.into());
        self
    }

    /// Returns the error kind.
    #[must_use]
    pub fn kind(&self) -> DeliveryErrorKind {
        self.kind
    }

    /// Returns the contextual message without the cause.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error raised when the run configuration is missing a required value.
#[derive(Debug, Clone, Error)]
#[error("missing required value for {field}")]
pub struct ConfigError {
    /// The flag or field that was empty.
    pub field: String,
}

impl ConfigError {
    /// Creates a new config error for `field`.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}
