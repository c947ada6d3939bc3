//! What a monitor run did.

use crate::core::{Step, StepStatus};
use crate::errors::{DeliveryError, ExtractError, FetchError};

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The element value was sent.
    Notified {
        /// The extracted text.
        value: String,
    },
    /// Extraction failed and the error was sent instead.
    ErrorReported {
        /// The extraction error that was reported.
        error: ExtractError,
    },
    /// The page could not be fetched; nothing was sent.
    FetchFailed {
        /// The fetch error.
        error: FetchError,
    },
    /// The notification could not be delivered.
    DeliveryFailed {
        /// The delivery error.
        error: DeliveryError,
        /// The extraction error the undelivered message was reporting, if any.
        extract_error: Option<ExtractError>,
    },
}

impl RunOutcome {
    /// Exit code for this outcome when strict exit codes are enabled.
    #[must_use]
    pub fn strict_exit_code(&self) -> u8 {
        match self {
            Self::Notified { .. } => 0,
            Self::FetchFailed { .. } => 1,
            Self::ErrorReported { .. } => 2,
            Self::DeliveryFailed { .. } => 3,
        }
    }
}

/// Per-step statuses and the final outcome of one run.
#[derive(Debug)]
pub struct RunReport {
    /// Fetch step status.
    pub fetch: StepStatus,
    /// Extract step status.
    pub extract: StepStatus,
    /// Notify step status.
    pub notify: StepStatus,
    /// How the run ended.
    pub outcome: RunOutcome,
}

impl RunReport {
    /// Returns the status recorded for `step`.
    #[must_use]
    pub fn status(&self, step: Step) -> StepStatus {
        match step {
            Step::Fetch => self.fetch,
            Step::Extract => self.extract,
            Step::Notify => self.notify,
        }
    }

    /// Returns true if the element value was extracted and delivered.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Notified { .. })
    }

    /// Process exit code for this run.
    ///
    /// Without `strict` every run exits 0 and failures are only logged.
    #[must_use]
    pub fn exit_code(&self, strict: bool) -> u8 {
        if strict {
            self.outcome.strict_exit_code()
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DeliveryErrorKind;

    fn report(outcome: RunOutcome) -> RunReport {
        RunReport {
            fetch: StepStatus::Succeeded,
            extract: StepStatus::Succeeded,
            notify: StepStatus::Succeeded,
            outcome,
        }
    }

    #[test]
    fn test_exit_codes() {
        let notified = report(RunOutcome::Notified { value: "$42".into() });
        let reported = report(RunOutcome::ErrorReported {
            error: ExtractError::not_found("#x"),
        });
        let fetch_failed = report(RunOutcome::FetchFailed {
            error: FetchError::network("http://x", "refused"),
        });
        let delivery_failed = report(RunOutcome::DeliveryFailed {
            error: DeliveryError::new(DeliveryErrorKind::Network, "down"),
            extract_error: None,
        });

        for r in [&notified, &reported, &fetch_failed, &delivery_failed] {
            assert_eq!(r.exit_code(false), 0);
        }
        assert_eq!(notified.exit_code(true), 0);
        assert_eq!(fetch_failed.exit_code(true), 1);
        assert_eq!(reported.exit_code(true), 2);
        assert_eq!(delivery_failed.exit_code(true), 3);

        assert!(notified.is_success());
        assert!(!reported.is_success());
    }

    #[test]
    fn test_status_lookup() {
        let mut r = report(RunOutcome::Notified { value: String::new() });
        r.notify = StepStatus::Failed;
        assert_eq!(r.status(Step::Fetch), StepStatus::Succeeded);
        assert_eq!(r.status(Step::Notify), StepStatus::Failed);
    }
}
