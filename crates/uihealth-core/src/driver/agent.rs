//! Agent strategy: one free-text usability evaluation per page.

use std::sync::Arc;

use tracing::{info, warn};
use uihealth_config::{AgentConfig, Config};
use uihealth_protocols::{
    AgentError, AgentEvaluation, EvaluationStatus, PageTarget, UsabilityEvaluator,
    UsabilityRequest,
};

use super::RunOutcome;
use crate::error::RunError;
use crate::evidence::slug_for_name;
use crate::report::{ReportAggregator, ReportWriter};
use crate::store::{ArtifactStore, FsArtifactStore};

/// Sends every registry page to an external evaluator, sequentially.
///
/// The runner borrows the evaluator; closing the underlying channel stays with
/// whoever opened it.
pub struct AgentRunner {
    evaluator: Arc<dyn UsabilityEvaluator>,
    settings: AgentConfig,
    screenshots: Arc<dyn ArtifactStore>,
    aggregator: ReportAggregator,
    writer: ReportWriter,
}

impl AgentRunner {
    pub fn new(
        evaluator: Arc<dyn UsabilityEvaluator>,
        settings: AgentConfig,
        screenshots: Arc<dyn ArtifactStore>,
        aggregator: ReportAggregator,
        writer: ReportWriter,
    ) -> Self {
        Self {
            evaluator,
            settings,
            screenshots,
            aggregator,
            writer,
        }
    }

    pub fn from_config(config: &Config, evaluator: Arc<dyn UsabilityEvaluator>) -> Self {
        let screenshots = Arc::new(FsArtifactStore::new(&config.agent.screenshot_dir));
        let aggregator = ReportAggregator::new(config.target.base_url.trim_end_matches('/'));
        let writer = ReportWriter::new(
            Arc::new(FsArtifactStore::new(&config.report.dir)),
            config.agent.report_file.clone(),
        )
        .keep_history(config.report.keep_history);

        Self::new(evaluator, config.agent.clone(), screenshots, aggregator, writer)
    }

    /// Evaluate every page in registry order, then write the report.
    ///
    /// Only startup-class agent errors abort the run.
    pub async fn run(&self, registry: &[PageTarget]) -> Result<RunOutcome<AgentEvaluation>, RunError> {
        let mut results = Vec::with_capacity(registry.len());
        for target in registry {
            results.push(self.evaluate_page(target).await?);
        }

        let report = self.aggregator.finalize(results);
        let location = self.writer.write(&report).await?;
        info!(
            "UX evaluation finished: ok={} failed={}/{}",
            report.ok,
            report.failed_count(),
            report.results.len()
        );

        Ok(RunOutcome { report, location })
    }

    /// Evaluate one page. Per-page agent failures are folded into the result.
    pub async fn evaluate_page(&self, target: &PageTarget) -> Result<AgentEvaluation, AgentError> {
        let name = target.display_name();
        let url = target.url(self.aggregator.base());
        info!("Evaluating {} at {}", name, url);

        let request = UsabilityRequest {
            url: url.clone(),
            task: self.settings.task_for(&name),
            headless: self.settings.headless,
        };

        let mut evaluation = AgentEvaluation {
            page: name.clone(),
            path: target.path.clone(),
            url,
            status: EvaluationStatus::Ok,
            evaluation: String::new(),
            screenshot: None,
        };

        let reply = match self.evaluator.evaluate(request).await {
            Ok(reply) => reply,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Evaluation of {} failed: {}", name, e);
                evaluation.status = EvaluationStatus::Error;
                evaluation.evaluation = e.to_string();
                return Ok(evaluation);
            }
        };

        if reply.is_error {
            evaluation.status = EvaluationStatus::Error;
        }
        evaluation.evaluation = reply.first_text().unwrap_or_default().to_string();

        if let Some(image) = reply.first_image() {
            let key = format!("{}.png", slug_for_name(&name));
            match self.screenshots.put(&key, image).await {
                Ok(location) => evaluation.screenshot = Some(location),
                Err(e) => warn!("Failed to store screenshot for {}: {}", name, e),
            }
        }

        Ok(evaluation)
    }
}
