//! Page-wide severity indicators and per-page finding accumulation.

use tracing::warn;
use uihealth_config::{IndicatorConfig, IndicatorLevel, SeverityConfig};
use uihealth_protocols::{BrowserPage, PageResult};

use crate::error::EvaluatorError;
use crate::evaluator::Outcome;

#[derive(Debug, Clone)]
enum IndicatorProbe {
    Selector(String),
    BodyText(String),
}

#[derive(Debug, Clone)]
struct Indicator {
    level: IndicatorLevel,
    message: String,
    probe: IndicatorProbe,
}

/// Checks generic failure surfaces that apply to every page regardless of its
/// own expectations (framework error overlays, failure banners, tracebacks).
#[derive(Debug, Clone)]
pub struct SeverityClassifier {
    indicators: Vec<Indicator>,
}

impl SeverityClassifier {
    pub fn new(indicators: &[IndicatorConfig]) -> Result<Self, EvaluatorError> {
        let indicators = indicators
            .iter()
            .map(|config| {
                let probe = match (&config.selector, &config.text) {
                    (Some(selector), None) => IndicatorProbe::Selector(selector.clone()),
                    (None, Some(text)) => IndicatorProbe::BodyText(text.clone()),
                    _ => return Err(EvaluatorError::InvalidIndicator(config.message.clone())),
                };
                Ok(Indicator {
                    level: config.level,
                    message: config.message.clone(),
                    probe,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { indicators })
    }

    pub fn from_config(config: &SeverityConfig) -> Result<Self, EvaluatorError> {
        Self::new(&config.indicators)
    }

    /// Check every indicator once, in configuration order, and record the ones
    /// that fire. Indicators are not probed.
    pub async fn scan(
        &self,
        page: &dyn BrowserPage,
        findings: &mut PageFindings,
    ) -> Result<(), EvaluatorError> {
        let mut body: Option<String> = None;

        for indicator in &self.indicators {
            let fired = match &indicator.probe {
                IndicatorProbe::Selector(selector) => page.count(selector).await? > 0,
                IndicatorProbe::BodyText(keyword) => {
                    if body.is_none() {
                        body = Some(page.first_text("body").await?.unwrap_or_default());
                    }
                    body.as_deref().is_some_and(|text| text.contains(keyword.as_str()))
                }
            };

            if fired {
                match indicator.level {
                    IndicatorLevel::Warning => findings.warn(indicator.message.clone()),
                    IndicatorLevel::Error => findings.error(indicator.message.clone()),
                }
            }
        }

        Ok(())
    }
}

/// Warnings and errors collected for one page, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFindings {
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl PageFindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.errors.push(message);
    }

    /// Merge an expectation outcome.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => {}
            Outcome::Warn(message) => self.warn(message),
            Outcome::Fail(message) => self.error(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Freeze into the page verdict.
    pub fn into_result(self, path: &str, url: &str, ms: u64) -> PageResult {
        PageResult::new(path, url, self.warnings, self.errors, ms)
    }
}
