//! Pushover message API client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::{Message, Notifier};
use crate::config::NotifyConfig;
use crate::errors::{DeliveryError, DeliveryErrorKind};

/// Body returned by the message endpoint.
#[derive(Debug, Default, Deserialize)]
struct PushoverResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    request: String,
    #[serde(default)]
    errors: Vec<String>,
}

/// Sends messages through the Pushover HTTP API.
#[derive(Debug, Clone)]
pub struct PushoverNotifier {
    client: reqwest::Client,
    api_url: String,
}

impl PushoverNotifier {
    /// Creates a notifier posting to `api_url`.
    pub fn new(api_url: impl Into<String>) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            DeliveryError::new(DeliveryErrorKind::Network, "failed to build HTTP client")
                .with_source(e)
        })?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// Creates a notifier for the endpoint in `config`.
    pub fn from_config(config: &NotifyConfig) -> Result<Self, DeliveryError> {
        Self::new(config.api_url.clone())
    }

    /// The endpoint messages are posted to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

fn decode_response(status: StatusCode, body: &[u8]) -> Result<String, DeliveryError> {
    match serde_json::from_slice::<PushoverResponse>(body) {
        Ok(response) if response.status == 1 => Ok(response.request),
        Ok(response) if response.errors.is_empty() => Err(DeliveryError::new(
            DeliveryErrorKind::Rejected,
            format!("Pushover rejected the message (HTTP {})", status.as_u16()),
        )),
        Ok(response) => Err(DeliveryError::new(
            DeliveryErrorKind::Rejected,
            format!("Pushover rejected the message: {}", response.errors.join(", ")),
        )),
        Err(e) => Err(DeliveryError::new(
            DeliveryErrorKind::Rejected,
            format!("unexpected response from Pushover (HTTP {})", status.as_u16()),
        )
        .with_source(e)),
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        message.validate()?;

        let form = [
            ("token", message.api_key.as_str()),
            ("user", message.recipient.as_str()),
            ("title", message.title.as_str()),
            ("message", message.body.as_str()),
        ];
        let response = self
            .client
            .post(&self.api_url)
            .form(&form)
            .send()
            .await
            .map_err(DeliveryError::network)?;

        let status = response.status();
        let body = response.bytes().await.map_err(DeliveryError::network)?;
        let request_id = decode_response(status, &body)?;
        debug!(request = %request_id, title = %message.title, "notification accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{unreachable_url, OneShotServer};

    fn message() -> Message {
        Message::new("a".repeat(30), "u".repeat(30), "Webpage Monitor change", "$42 & up")
    }

    #[test]
    fn test_decode_success() {
        let body = br#"{"status":1,"request":"5042853c-402d-4a18-abcb-168734a801de"}"#;
        assert_eq!(
            decode_response(StatusCode::OK, body).unwrap(),
            "5042853c-402d-4a18-abcb-168734a801de"
        );
    }

    #[test]
    fn test_decode_rejection_lists_errors() {
        let body = br#"{"user":"invalid","errors":["user identifier is invalid"],"status":0,"request":"x"}"#;
        let err = decode_response(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert_eq!(err.kind(), DeliveryErrorKind::Rejected);
        assert_eq!(
            err.to_string(),
            "Pushover rejected the message: user identifier is invalid"
        );
    }

    #[test]
    fn test_decode_rejection_without_errors() {
        let err = decode_response(StatusCode::TOO_MANY_REQUESTS, br#"{"status":0}"#).unwrap_err();
        assert_eq!(err.to_string(), "Pushover rejected the message (HTTP 429)");
    }

    #[test]
    fn test_decode_non_json() {
        let err = decode_response(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.kind(), DeliveryErrorKind::Rejected);
        assert!(err
            .to_string()
            .starts_with("unexpected response from Pushover (HTTP 502)"));
    }

    #[tokio::test]
    async fn test_send_posts_form() {
        let server = OneShotServer::start(
            "200 OK",
            "application/json",
            r#"{"status":1,"request":"abc"}"#,
        )
        .await
        .unwrap();
        let notifier = PushoverNotifier::new(server.url("/1/messages.json")).unwrap();

        notifier.send(&message()).await.unwrap();

        let request = server.received().await.unwrap();
        assert!(request.starts_with("POST /1/messages.json HTTP/1.1\r\n"));
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"));
        let body = request.split("\r\n\r\n").nth(1).unwrap();
        assert!(body.contains(&format!("token={}", "a".repeat(30))));
        assert!(body.contains(&format!("user={}", "u".repeat(30))));
        assert!(body.contains("title=Webpage+Monitor+change"));
        assert!(body.contains("message=%2442+%26+up"));
    }

    #[tokio::test]
    async fn test_send_reports_rejection() {
        let server = OneShotServer::start(
            "400 Bad Request",
            "application/json",
            r#"{"token":"invalid","errors":["application token is invalid"],"status":0,"request":"r"}"#,
        )
        .await
        .unwrap();
        let notifier = PushoverNotifier::new(server.url("/1/messages.json")).unwrap();

        let err = notifier.send(&message()).await.unwrap_err();
        assert_eq!(err.kind(), DeliveryErrorKind::Rejected);
        assert!(err.to_string().contains("application token is invalid"));
    }

    #[tokio::test]
    async fn test_invalid_message_never_hits_network() {
        let url = unreachable_url().await.unwrap();
        let notifier = PushoverNotifier::new(url).unwrap();
        let mut bad = message();
        bad.api_key = "nope".to_string();

        let err = notifier.send(&bad).await.unwrap_err();
        assert_eq!(err.kind(), DeliveryErrorKind::InvalidToken);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let url = unreachable_url().await.unwrap();
        let notifier = PushoverNotifier::new(url).unwrap();

        let err = notifier.send(&message()).await.unwrap_err();
        assert_eq!(err.kind(), DeliveryErrorKind::Network);
        assert!(err.to_string().starts_with("failed to send message: "));
    }

    #[test]
    fn test_from_config_uses_api_url() {
        let config = NotifyConfig::new("k", "r").with_api_url("http://localhost:1/x");
        let notifier = PushoverNotifier::from_config(&config).unwrap();
        assert_eq!(notifier.api_url(), "http://localhost:1/x");
    }
}
