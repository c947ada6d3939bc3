//! The fetch → extract → notify runner.

use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::report::{RunOutcome, RunReport};
use crate::config::MonitorConfig;
use crate::core::StepStatus;
use crate::errors::MonitorError;
use crate::extract::ElementExtractor;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::notify::{Message, Notifier, PushoverNotifier};

/// Runs one check of one page element.
///
/// The steps run strictly in order. A fetch failure ends the run without a
/// notification; an extraction failure is reported through the notifier in
/// place of the value; a delivery failure is only logged.
pub struct Monitor {
    config: MonitorConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: ElementExtractor,
    notifier: Arc<dyn Notifier>,
}

impl Monitor {
    /// Creates a monitor with the given fetcher and notifier.
    pub fn new(
        config: MonitorConfig,
        fetcher: Arc<dyn Fetcher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let extractor = ElementExtractor::new(config.selector.clone());
        Self {
            config,
            fetcher,
            extractor,
            notifier,
        }
    }

    /// Creates a monitor using the HTTP fetcher and the Pushover notifier.
    pub fn from_config(config: MonitorConfig) -> Result<Self, MonitorError> {
        let fetcher = HttpFetcher::new(config.fetch.clone())?;
        let notifier = PushoverNotifier::from_config(&config.notify)?;
        Ok(Self::new(config, Arc::new(fetcher), Arc::new(notifier)))
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Runs the pipeline once.
    pub async fn run(&self) -> RunReport {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "monitor_run",
            %run_id,
            url = %self.config.url,
            selector = %self.config.selector
        );
        self.run_steps().instrument(span).await
    }

    async fn run_steps(&self) -> RunReport {
        let page = match self
            .fetcher
            .fetch(&self.config.url)
            .instrument(info_span!("fetch"))
            .await
        {
            Ok(page) => page,
            Err(err) => {
                error!("Error while getting page HTML: {err}");
                return RunReport {
                    fetch: StepStatus::Failed,
                    extract: StepStatus::NotCalled,
                    notify: StepStatus::NotCalled,
                    outcome: RunOutcome::FetchFailed { error: err },
                };
            }
        };

        let extracted = self
            .extractor
            .extract(page)
            .instrument(info_span!("extract"))
            .await;
        let extract = StepStatus::from_result(&extracted);

        let message = match extracted {
            Ok(ref value) => {
                info!("Element {:?} = {value}", self.config.selector);
                self.message(&self.config.notify.change_title, value)
            }
            Err(ref err) => {
                error!("Error while getting element value: {err}");
                self.message(&self.config.notify.error_title, &err.to_string())
            }
        };

        let delivered = self
            .notifier
            .send(&message)
            .instrument(info_span!("notify", title = %message.title))
            .await;
        let notify = StepStatus::from_result(&delivered);

        let outcome = match (extracted, delivered) {
            (Ok(value), Ok(())) => RunOutcome::Notified { value },
            (Err(error), Ok(())) => RunOutcome::ErrorReported { error },
            (extracted, Err(error)) => {
                error!("Error while sending notification: {error}");
                RunOutcome::DeliveryFailed {
                    error,
                    extract_error: extracted.err(),
                }
            }
        };

        RunReport {
            fetch: StepStatus::Succeeded,
            extract,
            notify,
            outcome,
        }
    }

    fn message(&self, title: &str, body: &str) -> Message {
        Message::new(
            self.config.notify.api_key.as_str(),
            self.config.notify.recipient.as_str(),
            title,
            body,
        )
    }
}

/// Exit code under strict exit for a configuration that cannot start a run.
pub const EXIT_USAGE: u8 = 2;

/// Validates `config`, runs it once and returns the process exit code.
///
/// Without strict exit the code is always 0; failures are only logged.
pub async fn run_once(config: MonitorConfig) -> u8 {
    let strict = config.strict_exit;

    if let Err(err) = config.validate() {
        error!("{err}");
        return if strict { EXIT_USAGE } else { 0 };
    }

    let monitor = match Monitor::from_config(config) {
        Ok(monitor) => monitor,
        Err(err) => {
            error!("Error while setting up monitor: {err}");
            return if strict { EXIT_USAGE } else { 0 };
        }
    };

    monitor.run().await.exit_code(strict)
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("config", &self.config)
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}
