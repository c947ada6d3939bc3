//! Pipeline step and step status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three steps of a monitor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Download the page.
    Fetch,
    /// Pull the element text out of the page.
    Extract,
    /// Send the Pushover message.
    Notify,
}

impl Step {
    /// All steps in execution order.
    pub const ALL: [Self; 3] = [Self::Fetch, Self::Extract, Self::Notify];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Extract => write!(f, "extract"),
            Self::Notify => write!(f, "notify"),
        }
    }
}

/// The execution status of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The step was never reached.
    NotCalled,
    /// The step completed.
    Succeeded,
    /// The step returned an error.
    Failed,
}

impl Default for StepStatus {
    fn default() -> Self {
        Self::NotCalled
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCalled => write!(f, "not_called"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl StepStatus {
    /// Returns true once the step has run, whatever the result.
    #[must_use]
    pub fn was_called(&self) -> bool {
        !matches!(self, Self::NotCalled)
    }

    /// Builds a status from a step result.
    #[must_use]
    pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Self::Succeeded
        } else {
            Self::Failed
        }
    }
}
