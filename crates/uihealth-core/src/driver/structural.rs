//! Structural strategy: navigate, check expectations, screenshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};
use uihealth_config::Config;
use uihealth_protocols::{BrowserPage, PageResult, PageTarget};

use super::{RunOutcome, elapsed_ms};
use crate::error::{EvaluatorError, RunError};
use crate::evaluator::AssertionEvaluator;
use crate::evidence::EvidenceCapturer;
use crate::probe::ProbePolicy;
use crate::report::{ReportAggregator, ReportWriter};
use crate::severity::{PageFindings, SeverityClassifier};
use crate::store::FsArtifactStore;

const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Drives one shared browser page through the registry.
pub struct StructuralRunner {
    page: Arc<dyn BrowserPage>,
    navigation_timeout: Duration,
    evaluator: AssertionEvaluator,
    classifier: SeverityClassifier,
    capturer: EvidenceCapturer,
    aggregator: ReportAggregator,
    writer: ReportWriter,
}

impl StructuralRunner {
    pub fn new(
        page: Arc<dyn BrowserPage>,
        classifier: SeverityClassifier,
        capturer: EvidenceCapturer,
        aggregator: ReportAggregator,
        writer: ReportWriter,
    ) -> Self {
        Self {
            page,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            evaluator: AssertionEvaluator::default(),
            classifier,
            capturer,
            aggregator,
            writer,
        }
    }

    /// Wire a runner from configuration, with file system artifact stores.
    pub fn from_config(config: &Config, page: Arc<dyn BrowserPage>) -> Result<Self, EvaluatorError> {
        let classifier = SeverityClassifier::from_config(&config.severity)?;
        let capturer = EvidenceCapturer::new(
            Arc::new(FsArtifactStore::new(&config.evidence.screenshot_dir)),
            config.evidence.full_page,
        );
        let aggregator = ReportAggregator::new(config.target.base_url.trim_end_matches('/'));
        let writer = ReportWriter::new(
            Arc::new(FsArtifactStore::new(&config.report.dir)),
            config.report.file_name.clone(),
        )
        .keep_history(config.report.keep_history);

        Ok(Self::new(page, classifier, capturer, aggregator, writer)
            .with_evaluator(AssertionEvaluator::new(ProbePolicy::from_config(&config.probe)))
            .with_navigation_timeout(Duration::from_millis(config.browser.navigation_timeout_ms)))
    }

    pub fn with_evaluator(mut self, evaluator: AssertionEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Check every page in registry order, then write the report.
    pub async fn run(&self, registry: &[PageTarget]) -> Result<RunOutcome<PageResult>, RunError> {
        info!("Checking {} pages against {}", registry.len(), self.aggregator.base());

        let mut results = Vec::with_capacity(registry.len());
        for target in registry {
            results.push(self.check_page(target).await);
        }

        let report = self.aggregator.finalize(results);
        let location = self.writer.write(&report).await?;
        info!(
            "Run finished: ok={} failed={}/{}",
            report.ok,
            report.failed_count(),
            report.results.len()
        );

        Ok(RunOutcome { report, location })
    }

    /// Produce the verdict for one page. Never fails: every problem becomes a
    /// finding on the returned result.
    pub async fn check_page(&self, target: &PageTarget) -> PageResult {
        let started = Instant::now();
        let url = target.url(self.aggregator.base());
        info!("Checking {}", url);

        if let Err(e) = self.page.goto(&url, self.navigation_timeout).await {
            warn!("{} unreachable: {}", url, e);
            return PageResult::unreachable(&target.path, &url, e.to_string(), elapsed_ms(started));
        }

        let mut findings = PageFindings::new();
        match self.inspect(target, &mut findings).await {
            Ok(()) => {
                if let Err(e) = self.capturer.capture(self.page.as_ref(), &target.path).await {
                    findings.error(e.to_string());
                }
            }
            // The page broke mid-inspection; remaining checks and the screenshot
            // would only repeat the same failure.
            Err(e) => findings.error(e.to_string()),
        }

        findings.into_result(&target.path, &url, elapsed_ms(started))
    }

    async fn inspect(
        &self,
        target: &PageTarget,
        findings: &mut PageFindings,
    ) -> Result<(), EvaluatorError> {
        let page = self.page.as_ref();
        self.classifier.scan(page, findings).await?;
        for expectation in &target.expectations {
            let outcome = self.evaluator.evaluate(page, expectation).await?;
            findings.record(outcome);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "structural_tests.rs"]
mod tests;
