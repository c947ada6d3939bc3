//! Logging setup.
//!
//! The library only emits `tracing` events and spans; the binary decides where
//! they go through [`init_logging`].

mod logging;

pub use logging::{default_directives, init_logging, Verbosity};
