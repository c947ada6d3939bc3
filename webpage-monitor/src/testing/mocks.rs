//! Test doubles for the fetcher and notifier.

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::core::PageStream;
use crate::errors::{BoxError, DeliveryError, DeliveryErrorKind, FetchError, FetchErrorKind};
use crate::fetch::Fetcher;
use crate::notify::{Message, Notifier};

/// A fetcher that serves a fixed body and counts calls and releases.
#[derive(Debug)]
pub struct StaticFetcher {
    body: Vec<u8>,
    status: u16,
    read_error: Option<String>,
    call_count: Mutex<usize>,
    releases: Arc<AtomicUsize>,
}

impl StaticFetcher {
    /// Creates a fetcher serving `body` with status 200.
    #[must_use]
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            status: 200,
            read_error: None,
            call_count: Mutex::new(0),
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sets the reported status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Makes the body stream fail after the first chunk.
    #[must_use]
    pub fn with_read_error(mut self, error: impl Into<String>) -> Self {
        self.read_error = Some(error.into());
        self
    }

    /// Returns the number of times the fetcher was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock()
    }

    /// Returns the number of served streams that have been released.
    #[must_use]
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<PageStream, FetchError> {
        *self.call_count.lock() += 1;

        let mut chunks: Vec<Result<Vec<u8>, BoxError>> = vec![Ok(self.body.clone())];
        if let Some(ref error) = self.read_error {
            chunks.push(Err(BoxError::from(error.clone())));
        }

        let releases = Arc::clone(&self.releases);
        Ok(PageStream::new(url, self.status, stream::iter(chunks)).with_release_hook(move || {
            releases.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

/// A fetcher that always fails.
#[derive(Debug)]
pub struct FailingFetcher {
    kind: FetchErrorKind,
    cause: String,
    call_count: Mutex<usize>,
}

impl FailingFetcher {
    /// Creates a fetcher failing with a network error.
    #[must_use]
    pub fn network(cause: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Network,
            cause: cause.into(),
            call_count: Mutex::new(0),
        }
    }

    /// Creates a fetcher failing as if the request could not be built.
    #[must_use]
    pub fn invalid_request(cause: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::InvalidRequest,
            cause: cause.into(),
            call_count: Mutex::new(0),
        }
    }

    /// Returns the number of times the fetcher was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock()
    }
}

#[async_trait]
impl Fetcher for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<PageStream, FetchError> {
        *self.call_count.lock() += 1;
        let error = match self.kind {
            FetchErrorKind::Network => FetchError::network(url, self.cause.clone()),
            FetchErrorKind::InvalidRequest => FetchError::invalid_request(url, self.cause.clone()),
        };
        Err(error)
    }
}

/// A notifier that records every message it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<Message>>,
    failure: Option<(DeliveryErrorKind, String)>,
}

impl RecordingNotifier {
    /// Creates a notifier that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier that records, then fails every send.
    #[must_use]
    pub fn failing(kind: DeliveryErrorKind, message: impl Into<String>) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            failure: Some((kind, message.into())),
        }
    }

    /// Returns the recorded messages.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    /// Returns the number of send attempts.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.messages.lock().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        self.messages.lock().push(message.clone());
        match self.failure {
            Some((kind, ref text)) => Err(DeliveryError::new(kind, text.clone())),
            None => Ok(()),
        }
    }
}
