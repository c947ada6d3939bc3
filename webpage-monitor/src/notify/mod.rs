//! Push notifications.
//!
//! A [`Message`] is built right before the single delivery attempt and handed
//! to a [`Notifier`]. [`PushoverNotifier`] is the production implementation.

mod pushover;

use async_trait::async_trait;
use std::fmt;

use crate::errors::{DeliveryError, DeliveryErrorKind};

pub use pushover::PushoverNotifier;

/// Maximum message body length accepted by Pushover, in characters.
pub const MESSAGE_MAX_LENGTH: usize = 1024;

/// Maximum message title length accepted by Pushover, in characters.
pub const TITLE_MAX_LENGTH: usize = 250;

/// Length of Pushover application and user keys.
pub const KEY_LENGTH: usize = 30;

/// A titled message for one recipient.
#[derive(Clone, PartialEq, Eq)]
pub struct Message {
    /// Message title.
    pub title: String,
    /// Message body.
    pub body: String,
    /// Recipient (user or group key).
    pub recipient: String,
    /// Application API token.
    pub api_key: String,
}

impl Message {
    /// Creates a message.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        recipient: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            recipient: recipient.into(),
            api_key: api_key.into(),
        }
    }

    /// Checks the message against the service limits before sending.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        if self.api_key.is_empty() {
            return Err(DeliveryError::new(DeliveryErrorKind::InvalidToken, "empty API token"));
        }
        if !is_service_key(&self.api_key) {
            return Err(DeliveryError::new(DeliveryErrorKind::InvalidToken, "invalid API token"));
        }
        if self.recipient.is_empty() {
            return Err(DeliveryError::new(
                DeliveryErrorKind::InvalidRecipient,
                "empty recipient token",
            ));
        }
        if !is_service_key(&self.recipient) {
            return Err(DeliveryError::new(
                DeliveryErrorKind::InvalidRecipient,
                "invalid recipient token",
            ));
        }
        if self.body.is_empty() {
            return Err(DeliveryError::new(
                DeliveryErrorKind::InvalidMessage,
                "message can't be empty",
            ));
        }
        if self.body.chars().count() > MESSAGE_MAX_LENGTH {
            return Err(DeliveryError::new(DeliveryErrorKind::InvalidMessage, "message too long"));
        }
        if self.title.chars().count() > TITLE_MAX_LENGTH {
            return Err(DeliveryError::new(
                DeliveryErrorKind::InvalidMessage,
                "message title too long",
            ));
        }
        Ok(())
    }
}

fn is_service_key(key: &str) -> bool {
    key.len() == KEY_LENGTH && key.bytes().all(|b| b.is_ascii_alphanumeric())
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("title", &self.title)
            .field("body", &self.body)
            .field("recipient", &self.recipient)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Protocol for notification delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message` once.
    async fn send(&self, message: &Message) -> Result<(), DeliveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Message {
        Message::new("a".repeat(30), "u".repeat(30), "Webpage Monitor change", "$42")
    }

    fn kind_of(message: &Message) -> DeliveryErrorKind {
        message.validate().unwrap_err().kind()
    }

    #[test]
    fn test_valid_message() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_token_checks() {
        let mut message = valid();
        message.api_key = String::new();
        assert_eq!(message.validate().unwrap_err().to_string(), "empty API token");

        message.api_key = "short".to_string();
        assert_eq!(kind_of(&message), DeliveryErrorKind::InvalidToken);

        message.api_key = format!("{}!", "a".repeat(29));
        assert_eq!(message.validate().unwrap_err().to_string(), "invalid API token");
    }

    #[test]
    fn test_recipient_checks() {
        let mut message = valid();
        message.recipient = String::new();
        assert_eq!(message.validate().unwrap_err().to_string(), "empty recipient token");

        message.recipient = "u".repeat(31);
        assert_eq!(kind_of(&message), DeliveryErrorKind::InvalidRecipient);
    }

    #[test]
    fn test_body_and_title_limits() {
        let mut message = valid();
        message.body = String::new();
        assert_eq!(message.validate().unwrap_err().to_string(), "message can't be empty");

        message.body = "é".repeat(MESSAGE_MAX_LENGTH);
        assert!(message.validate().is_ok());

        message.body.push('x');
        assert_eq!(message.validate().unwrap_err().to_string(), "message too long");

        message.body = "ok".to_string();
        message.title = "t".repeat(TITLE_MAX_LENGTH + 1);
        assert_eq!(kind_of(&message), DeliveryErrorKind::InvalidMessage);
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", valid());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&"a".repeat(30)));
    }
}
