//! Evaluation agent configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::default_true;

/// External evaluation agent used by the agent strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Executable that speaks MCP over stdio.
    #[serde(default = "default_command")]
    pub command: String,

    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Tool invoked once per page. The default `uvx` server (webEvalAgent) names
    /// its tool `web_eval_agent` and its headless flag `headless_browser`; set
    /// `tool` and `[agent.arguments]` accordingly when using it.
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Argument names used in the tool call.
    #[serde(default)]
    pub arguments: ToolArguments,

    /// Task text sent with each request. `{page}` is replaced by the page name.
    #[serde(default = "default_task_template")]
    pub task_template: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_agent_screenshot_dir")]
    pub screenshot_dir: PathBuf,

    #[serde(default = "default_agent_report_file")]
    pub report_file: String,

    /// Per-call timeout. Unset leaves timeouts to the agent itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_timeout_secs: Option<u64>,

    /// Time allowed between SIGTERM and a forced kill.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
            tool: default_tool(),
            arguments: ToolArguments::default(),
            task_template: default_task_template(),
            headless: default_true(),
            screenshot_dir: default_agent_screenshot_dir(),
            report_file: default_agent_report_file(),
            call_timeout_secs: None,
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

/// Keys under which url, task and the headless flag are passed to the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolArguments {
    pub url: String,
    pub task: String,
    pub headless: String,
}

impl Default for ToolArguments {
    fn default() -> Self {
        Self {
            url: "url".to_string(),
            task: "task".to_string(),
            headless: "headless".to_string(),
        }
    }
}

impl AgentConfig {
    /// Render the task text for one page.
    pub fn task_for(&self, page_name: &str) -> String {
        self.task_template.replace("{page}", page_name)
    }
}

fn default_command() -> String {
    "uvx".to_string()
}

fn default_args() -> Vec<String> {
    [
        "--refresh-package",
        "webEvalAgent",
        "--from",
        "git+https://github.com/Operative-Sh/web-eval-agent.git",
        "webEvalAgent",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_tool() -> String {
    "evaluate_usability".to_string()
}

fn default_task_template() -> String {
    "Evaluate the user experience of the financial dashboard {page} page.\n\
     Check for any errors or missing elements.\n\
     For macro pages (Regimes/Risk/Recession), ensure charts are rendered with multi-series data.\n\
     For all pages, verify badges and tables are displayed.\n\
     If charts are missing, note that data might not be loaded.\n\
     Assess overall usability and report any issues."
        .to_string()
}

fn default_agent_screenshot_dir() -> PathBuf {
    PathBuf::from("artifacts/smoke/dash_eval")
}

fn default_agent_report_file() -> String {
    "dash_ux_eval_report.json".to_string()
}

fn default_shutdown_grace_ms() -> u64 {
    2000
}
