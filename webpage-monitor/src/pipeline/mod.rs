//! Pipeline execution.
//!
//! - [`Monitor`] wires a fetcher, the extractor and a notifier together
//! - [`run_once`] validates a configuration, runs it and picks the exit code
//! - [`RunReport`] records what each step did and how the run ended

mod monitor;
mod report;


pub use monitor::{run_once, Monitor, EXIT_USAGE};
pub use report::{RunOutcome, RunReport};
