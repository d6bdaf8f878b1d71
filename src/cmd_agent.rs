//! The agent strategy: usability evaluation through the MCP agent.

use std::process::ExitCode;
use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use uihealth_config::Config;
use uihealth_core::{AgentRunner, RunError, RunOutcome};
use uihealth_mcp_agent::AgentChannel;
use uihealth_protocols::AgentEvaluation;

use crate::fatal::Fatal;
use crate::print_json;

pub(crate) async fn run_agent(config: &Config) -> Result<ExitCode, Fatal> {
    let channel = Arc::new(AgentChannel::new(config.agent.clone()));
    channel.connect().await.map_err(Fatal::agent)?;

    let outcome = evaluate_and_close(config, channel).await.map_err(Fatal::run)?;
    info!("Report written to {}", outcome.location);
    print_json(&json!({
        "ok": true,
        "message": "UX evaluation complete",
        "report": outcome.location,
        "screenshots": config.agent.screenshot_dir.display().to_string(),
    }));
    Ok(ExitCode::SUCCESS)
}

/// Run the registry through a connected channel. The channel is closed whatever
/// happened to the pages.
async fn evaluate_and_close(
    config: &Config,
    channel: Arc<AgentChannel>,
) -> Result<RunOutcome<AgentEvaluation>, RunError> {
    let runner = AgentRunner::from_config(config, channel.clone());
    let result = runner.run(&config.registry()).await;

    if let Err(e) = channel.close().await {
        warn!("Failed to close agent channel: {}", e);
    }
    result
}
