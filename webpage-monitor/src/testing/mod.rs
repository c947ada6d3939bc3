//! Testing utilities for monitor runs.
//!
//! This module provides:
//! - Fetcher and notifier doubles that record what they were asked to do
//! - A one-shot local HTTP server for exercising the real clients

mod mocks;
mod server;

pub use mocks::{FailingFetcher, RecordingNotifier, StaticFetcher};
pub use server::{unreachable_url, OneShotServer};
