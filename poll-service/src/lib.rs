//! Drives listener registries on a fixed interval.
//!
//! Every cycle polls each target once. Failures are reported and do not stop the loop.
//! An authentication failure triggers a fresh login before the next cycle, and a rate
//! limit answer delays it by the advertised amount.

use reddit_client::{PollTarget, Session};
use redwatch_core::{CoreError, ErrorExt, ErrorReporter, RedditApiError, TokenDuration};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of one pass over all targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub delivered: usize,
    pub failed: usize,
    pub relogged_in: bool,
    pub backoff: Option<Duration>,
}

pub struct PollingService {
    session: Arc<Session>,
    targets: Vec<Arc<dyn PollTarget>>,
    interval: Duration,
    token_duration: TokenDuration,
    reporter: ErrorReporter,
    cancel: CancellationToken,
}

impl PollingService {
    pub fn new(session: Arc<Session>, interval: Duration) -> Self {
        Self {
            session,
            targets: Vec::new(),
            interval,
            token_duration: TokenDuration::default(),
            reporter: ErrorReporter::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Duration requested when the service has to log in again.
    pub fn with_token_duration(mut self, duration: TokenDuration) -> Self {
        self.token_duration = duration;
        self
    }

    pub fn with_reporter(mut self, reporter: ErrorReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn add_target(&mut self, target: Arc<dyn PollTarget>) {
        info!("Watching {}", target.resource());
        self.targets.push(target);
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// A token that stops [`PollingService::start`] when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn stop(&self) {
        info!("Stopping polling service");
        self.cancel.cancel();
    }

    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();
        let mut needs_login = false;

        for target in &self.targets {
            if self.cancel.is_cancelled() {
                break;
            }
            match target.notify_all().await {
                Ok(delivered) => {
                    debug!("{}: {} new item(s)", target.resource(), delivered);
                    report.delivered += delivered;
                }
                Err(e) => {
                    warn!("Polling {} failed", target.resource());
                    self.reporter.report_error(&e);
                    report.failed += 1;
                    needs_login |= e.requires_login();
                    if let Some(wait) = rate_limit_wait(&e) {
                        report.backoff = Some(report.backoff.map_or(wait, |b| b.max(wait)));
                    }
                }
            }
        }

        if needs_login {
            info!("Session no longer valid, logging in again");
            match self.session.login(self.token_duration).await {
                Ok(()) => report.relogged_in = true,
                Err(e) => self.reporter.report_error(&e),
            }
        }
        report
    }

    /// Polls every target once per interval until stopped.
    pub async fn start(&self) -> Result<(), CoreError> {
        if self.targets.is_empty() {
            return Err(CoreError::InvalidInput {
                message: "no poll targets registered".to_string(),
            });
        }

        info!(
            "Polling {} target(s) every {:?}",
            self.targets.len(),
            self.interval
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let report = self.run_cycle().await;
            if report.delivered > 0 || report.failed > 0 {
                info!(
                    "Poll cycle: {} delivered, {} failed",
                    report.delivered, report.failed
                );
            }

            if let Some(backoff) = report.backoff {
                info!("Rate limited, pausing for {:?}", backoff);
                tokio::select! {
                    _ = self.cancel.cancelled() => break,
                    _ = tokio::time::sleep(backoff) => {}
                }
                ticker.reset();
            }
        }

        info!("Polling service stopped");
        Ok(())
    }
}

fn rate_limit_wait(error: &CoreError) -> Option<Duration> {
    match error {
        CoreError::RedditApi(api_error @ RedditApiError::RateLimitExceeded { .. }) => {
            api_error.retry_after()
        }
        _ => None,
    }
}
