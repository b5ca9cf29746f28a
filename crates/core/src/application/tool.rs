// Tool Probe - what is installed, independent of any hub

use crate::application::command::AzCommand;
use crate::domain::ToolVersion;
use crate::error::Result;
use crate::port::CommandRunner;

/// `az version`
pub async fn tool_version(runner: &dyn CommandRunner) -> Result<ToolVersion> {
    let args = AzCommand::new(&["version"]).into_args();
    let value = runner.run(&args).await?;
    Ok(serde_json::from_value(value)?)
}
