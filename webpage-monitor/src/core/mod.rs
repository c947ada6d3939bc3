//! Core domain types shared by the pipeline steps.
//!
//! - Step and step status enums
//! - The page stream handed from fetcher to extractor

mod status;
mod stream;

pub use status::{Step, StepStatus};
pub use stream::{PageStream, ReleaseHook};
