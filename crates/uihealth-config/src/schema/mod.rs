//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use uihealth_protocols::PageTarget;

mod schema_agent;
mod schema_browser;
mod schema_registry;

pub use schema_agent::*;
pub use schema_browser::*;
pub use schema_registry::default_registry;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub severity: SeverityConfig,

    #[serde(default)]
    pub evidence: EvidenceConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    /// Page registry. Empty means the built-in registry.
    #[serde(default)]
    pub pages: Vec<PageTarget>,
}

impl Config {
    /// The page registry for this run, in evaluation order.
    pub fn registry(&self) -> Vec<PageTarget> {
        if self.pages.is_empty() {
            default_registry()
        } else {
            self.pages.clone()
        }
    }
}

/// Application under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8050".to_string()
}

/// Retry budget for asynchronously rendered elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_interval_ms() -> u64 {
    300
}

/// Level assigned to a page-wide indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorLevel {
    Warning,
    Error,
}

/// A page-wide indicator checked on every page, independent of its expectations.
///
/// Exactly one of `selector` or `text` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub level: IndicatorLevel,

    /// Finding recorded when the indicator fires.
    pub message: String,

    /// Fires when at least one element matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Fires when the page body text contains this keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl IndicatorConfig {
    pub fn selector(level: IndicatorLevel, selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            selector: Some(selector.into()),
            text: None,
        }
    }

    pub fn text(level: IndicatorLevel, text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            selector: None,
            text: Some(text.into()),
        }
    }
}

/// Severity classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityConfig {
    #[serde(default = "default_indicators")]
    pub indicators: Vec<IndicatorConfig>,
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            indicators: default_indicators(),
        }
    }
}

fn default_indicators() -> Vec<IndicatorConfig> {
    vec![
        IndicatorConfig::selector(
            IndicatorLevel::Warning,
            ".dash-error-menu",
            "dash-error-menu visible",
        ),
        IndicatorConfig::selector(IndicatorLevel::Error, ".alert-danger", "alert-danger visible"),
    ]
}

/// Screenshot evidence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceConfig {
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,

    #[serde(default = "default_true")]
    pub full_page: bool,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: default_screenshot_dir(),
            full_page: default_true(),
        }
    }
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from("artifacts/ui_health")
}

/// Report persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_reports_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_report_file")]
    pub file_name: String,

    /// Keep every run of the day instead of overwriting the dated report.
    #[serde(default)]
    pub keep_history: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: default_reports_dir(),
            file_name: default_report_file(),
            keep_history: false,
        }
    }
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("data/reports")
}

fn default_report_file() -> String {
    "ui_health_report.json".to_string()
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
