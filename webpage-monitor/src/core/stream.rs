//! The page body handed from the fetcher to the extractor.

use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use std::fmt;
use tracing::debug;

use crate::errors::BoxError;

/// Callback run when a page stream is released.
pub type ReleaseHook = Box<dyn FnOnce() + Send>;

/// Releases the stream exactly once, on whichever path drops it.
struct ReleaseGuard {
    url: String,
    hook: Option<ReleaseHook>,
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        debug!(url = %self.url, "page stream released");
        if let Some(hook) = self.hook.take() {
            hook();
        }
    }
}

/// A single-owner stream of page body chunks.
///
/// Consuming the stream with [`PageStream::read_to_end`] or dropping it
/// releases the underlying connection. A release hook, if set, runs at that
/// moment and never again.
pub struct PageStream {
    url: String,
    status: u16,
    chunks: BoxStream<'static, Result<Vec<u8>, BoxError>>,
    guard: ReleaseGuard,
}

impl PageStream {
    /// Wraps a chunk stream fetched from `url`.
    pub fn new<S>(url: impl Into<String>, status: u16, chunks: S) -> Self
    where
        S: Stream<Item = Result<Vec<u8>, BoxError>> + Send + 'static,
    {
        let url = url.into();
        Self {
            guard: ReleaseGuard {
                url: url.clone(),
                hook: None,
            },
            url,
            status,
            chunks: chunks.boxed(),
        }
    }

    /// Creates an in-memory stream holding `body`, reported as status 200.
    pub fn from_bytes(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self::new(url, 200, stream::once(async move { Ok(body) }))
    }

    /// Registers a callback to run when the stream is released.
    #[must_use]
    pub fn with_release_hook<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.guard.hook = Some(Box::new(hook));
        self
    }

    /// The URL the stream was fetched from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The HTTP status of the response.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reads every remaining chunk, then releases the stream.
    pub async fn read_to_end(mut self) -> Result<Vec<u8>, BoxError> {
        let mut body = Vec::new();
        while let Some(chunk) = self.chunks.next().await {
            body.extend_from_slice(&chunk?);
        }
        Ok(body)
    }
}

impl fmt::Debug for PageStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageStream")
            .field("url", &self.url)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_hook() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let hook_count = Arc::clone(&count);
        (count, move || {
            hook_count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test]
    async fn test_read_to_end_joins_chunks() {
        let chunks = stream::iter(vec![
            Ok(b"<p>".to_vec()),
            Ok(b"hello".to_vec()),
            Ok(b"</p>".to_vec()),
        ]);
        let page = PageStream::new("http://test", 200, chunks);
        assert_eq!(page.read_to_end().await.unwrap(), b"<p>hello</p>");
    }

    #[tokio::test]
    async fn test_release_after_read() {
        let (count, hook) = counting_hook();
        let page = PageStream::from_bytes("http://test", "body").with_release_hook(hook);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        page.read_to_end().await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_release_after_read_error() {
        let (count, hook) = counting_hook();
        let chunks = stream::iter(vec![
            Ok(b"partial".to_vec()),
            Err(BoxError::from("connection reset")),
        ]);
        let page = PageStream::new("http://test", 200, chunks).with_release_hook(hook);

        let err = page.read_to_end().await.unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_on_drop_without_read() {
        let (count, hook) = counting_hook();
        let page = PageStream::from_bytes("http://test", "body").with_release_hook(hook);
        drop(page);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_accessors_and_debug() {
        let page = PageStream::new("http://test/x", 404, stream::empty());
        assert_eq!(page.url(), "http://test/x");
        assert_eq!(page.status(), 404);
        assert!(format!("{page:?}").contains("404"));
    }
}
