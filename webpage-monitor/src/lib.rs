//! # Webpage Monitor
//!
//! Checks one element of one webpage and reports its text through Pushover.
//!
//! A run is a fixed three-step pipeline:
//!
//! - **Fetch**: one GET with an identifying user agent, body kept as a stream
//! - **Extract**: text of the first element matching a CSS selector
//! - **Notify**: one Pushover message with the value, or with the extraction
//!   error when there is no value
//!
//! Runs are stateless. Scheduling, retries and change detection are left to
//! whatever invokes the binary.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use webpage_monitor::prelude::*;
//!
//! let config = MonitorConfig::new(
//!     "https://example.com/item",
//!     "#price",
//!     NotifyConfig::new(api_token, user_key),
//! );
//! let report = Monitor::from_config(config)?.run().await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod extract;
pub mod fetch;
pub mod notify;
pub mod observability;
pub mod pipeline;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(feature = "cli")]
pub mod cli;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{FetchConfig, MonitorConfig, NotifyConfig};
    pub use crate::core::{PageStream, Step, StepStatus};
    pub use crate::errors::{
        DeliveryError, DeliveryErrorKind, ExtractError, ExtractErrorKind, FetchError,
        FetchErrorKind, MonitorError,
    };
    pub use crate::extract::{extract_text, ElementExtractor};
    pub use crate::fetch::{Fetcher, HttpFetcher};
    pub use crate::notify::{Message, Notifier, PushoverNotifier};
    pub use crate::pipeline::{Monitor, RunOutcome, RunReport};
}
