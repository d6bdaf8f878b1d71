//! Startup-class failures and the JSON they print.

use serde::Serialize;
use uihealth_browser_cdp::BrowserError;
use uihealth_config::{ConfigError, ValidationResult};
use uihealth_core::{EvaluatorError, RunError};
use uihealth_protocols::AgentError;

/// A failure that ends the process with `{ ok: false, error, hint? }` on stderr.
#[derive(Debug, Serialize)]
pub(crate) struct Fatal {
    ok: bool,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
    detail: String,
}

impl Fatal {
    fn new(error: &'static str, detail: impl ToString) -> Self {
        Self {
            ok: false,
            error,
            hint: None,
            detail: detail.to_string(),
        }
    }

    fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn kind(&self) -> &'static str {
        self.error
    }

    pub fn config(error: ConfigError) -> Self {
        Self::new("config-invalid", error)
    }

    pub fn invalid(result: &ValidationResult) -> Self {
        let detail = result
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::new("config-invalid", detail).hint("run `uihealth validate` for details")
    }

    pub fn indicators(error: EvaluatorError) -> Self {
        Self::new("config-invalid", error)
    }

    pub fn browser(error: BrowserError) -> Self {
        Self::new("browser-unavailable", error)
            .hint("start Chrome with --remote-debugging-port=9222 or set browser.chrome_path")
    }

    pub fn agent(error: AgentError) -> Self {
        Self::run(RunError::from(error))
    }

    pub fn run(error: RunError) -> Self {
        let kind = error.kind();
        let fatal = Self::new(kind, error);
        match kind {
            "spawn-agent-failed" => fatal.hint("install uv (https://docs.astral.sh/uv/) or set agent.command"),
            _ => fatal.hint("check that report.dir is writable"),
        }
    }

    pub fn snap(error: impl ToString) -> Self {
        Self::new("snap-failed", error)
    }

    /// Print to stderr as a single JSON line.
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!(r#"{{"ok":false,"error":"{}"}}"#, self.error),
        }
    }
}
