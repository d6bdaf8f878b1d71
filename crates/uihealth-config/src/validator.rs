//! Configuration validation.

use std::collections::HashSet;

use uihealth_protocols::Expectation;

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Above this many milliseconds per expectation the run gets slow.
const SLOW_PROBE_BUDGET_MS: u64 = 30_000;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_target(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_probe(config, &mut result);
        Self::validate_severity(config, &mut result);
        Self::validate_report(config, &mut result);
        Self::validate_agent(config, &mut result);
        Self::validate_pages(config, &mut result);

        result
    }

    fn validate_target(config: &Config, result: &mut ValidationResult) {
        let base = config.target.base_url.trim();
        if base.is_empty() {
            result.add_error(ValidationError::new("target.base_url", "Base URL cannot be empty"));
            return;
        }

        match url::Url::parse(base) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            Ok(parsed) => result.add_error(ValidationError::new(
                "target.base_url",
                format!("Unsupported scheme '{}'", parsed.scheme()),
            )),
            Err(e) => result.add_error(ValidationError::new(
                "target.base_url",
                format!("Invalid URL: {}", e),
            )),
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;

        if browser.navigation_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "browser.navigation_timeout_ms",
                "Navigation timeout must be greater than 0",
            ));
        }

        if browser.viewport_width == 0 || browser.viewport_height == 0 {
            result.add_error(ValidationError::new(
                "browser.viewport",
                "Viewport dimensions must be greater than 0",
            ));
        }

        if let Some(endpoint) = &browser.endpoint {
            if url::Url::parse(endpoint).is_err() {
                result.add_error(ValidationError::new(
                    "browser.endpoint",
                    format!("Invalid DevTools endpoint: {}", endpoint),
                ));
            }
        }

        if let Some(path) = &browser.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("{} does not exist", path.display()),
                ));
            }
        }
    }

    fn validate_probe(config: &Config, result: &mut ValidationResult) {
        let probe = &config.probe;

        if probe.max_attempts == 0 {
            result.add_error(ValidationError::new(
                "probe.max_attempts",
                "max_attempts must be greater than 0",
            ));
        }

        let budget = u64::from(probe.max_attempts).saturating_mul(probe.interval_ms);
        if budget > SLOW_PROBE_BUDGET_MS {
            result.add_warning(ValidationWarning::new(
                "probe",
                format!(
                    "Retry budget is {} ms per expectation, runs against broken pages will be slow",
                    budget
                ),
            ));
        }
    }

    fn validate_severity(config: &Config, result: &mut ValidationResult) {
        for (i, indicator) in config.severity.indicators.iter().enumerate() {
            let path = format!("severity.indicators[{}]", i);
            match (&indicator.selector, &indicator.text) {
                (Some(_), Some(_)) => result.add_error(ValidationError::new(
                    &path,
                    "Set either selector or text, not both",
                )),
                (None, None) => result.add_error(ValidationError::new(
                    &path,
                    "One of selector or text is required",
                )),
                (Some(s), None) if s.trim().is_empty() => {
                    result.add_error(ValidationError::new(&path, "Selector cannot be empty"))
                }
                (None, Some(t)) if t.is_empty() => {
                    result.add_error(ValidationError::new(&path, "Text cannot be empty"))
                }
                _ => {}
            }

            if indicator.message.trim().is_empty() {
                result.add_error(ValidationError::new(&path, "Message cannot be empty"));
            }
        }
    }

    fn validate_report(config: &Config, result: &mut ValidationResult) {
        if config.report.file_name.trim().is_empty() {
            result.add_error(ValidationError::new(
                "report.file_name",
                "Report file name cannot be empty",
            ));
        }
        if config.report.file_name.contains('/') {
            result.add_error(ValidationError::new(
                "report.file_name",
                "Report file name must not contain a path separator",
            ));
        }
    }

    fn validate_agent(config: &Config, result: &mut ValidationResult) {
        let agent = &config.agent;

        if agent.command.trim().is_empty() {
            result.add_error(ValidationError::new("agent.command", "Command cannot be empty"));
        }
        if agent.tool.trim().is_empty() {
            result.add_error(ValidationError::new("agent.tool", "Tool name cannot be empty"));
        }
        let keys = [
            ("agent.arguments.url", &agent.arguments.url),
            ("agent.arguments.task", &agent.arguments.task),
            ("agent.arguments.headless", &agent.arguments.headless),
        ];
        for (path, key) in keys {
            if key.trim().is_empty() {
                result.add_error(ValidationError::new(path, "Argument name cannot be empty"));
            }
        }
        if !agent.task_template.contains("{page}") {
            result.add_warning(ValidationWarning::new(
                "agent.task_template",
                "Template has no {page} placeholder, every page gets the same task",
            ));
        }
        if agent.call_timeout_secs == Some(0) {
            result.add_error(ValidationError::new(
                "agent.call_timeout_secs",
                "Timeout must be greater than 0 when set",
            ));
        }
    }

    fn validate_pages(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (i, page) in config.registry().iter().enumerate() {
            let path = format!("pages[{}]", i);

            if page.path.trim().is_empty() {
                result.add_error(ValidationError::new(&path, "Page path cannot be empty"));
            }

            if !seen.insert(page.path.clone()) {
                result.add_warning(ValidationWarning::new(
                    &path,
                    format!("Duplicate page path '{}'", page.path),
                ));
            }

            if page.expectations.is_empty() {
                result.add_warning(ValidationWarning::new(
                    &path,
                    format!("Page '{}' has no expectations", page.path),
                ));
            }

            for (j, expectation) in page.expectations.iter().enumerate() {
                let exp_path = format!("{}.expectations[{}]", path, j);
                if let Expectation::AnyOf { selectors } = expectation {
                    if selectors.is_empty() {
                        result.add_error(ValidationError::new(
                            &exp_path,
                            "any_of needs at least one selector",
                        ));
                    }
                }
                if expectation.selectors().iter().any(|s| s.trim().is_empty()) {
                    result.add_error(ValidationError::new(&exp_path, "Selector cannot be empty"));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
