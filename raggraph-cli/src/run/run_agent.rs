//! Runs the configured preset over given collaborators; no env, no network setup.

use std::io::Write;
use std::sync::Arc;

use raggraph::{AgentState, LlmClient, RagAgent, Retriever};

use crate::config::RunConfig;

use super::Error;

/// Builds the preset named by `config.agent` and answers `question`.
///
/// With `config.stream`, generated text fragments are written to stdout as they
/// arrive. With `config.verbose`, node entry and exit are logged.
pub async fn run_agent(
    config: &RunConfig,
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    question: &str,
) -> Result<AgentState, Error> {
    let mut agent = RagAgent::new(config.agent, llm, retriever, &config.agent_config())?;
    if config.verbose {
        agent = agent.with_node_logging();
    }

    if !config.stream {
        return Ok(agent.invoke(question).await?);
    }

    let mut stdout = std::io::stdout();
    let mut printed = false;
    let state = agent
        .stream_with_callback(question, |event| {
            if let Some(text) = event.text() {
                let _ = write!(stdout, "{}", text);
                let _ = stdout.flush();
                printed = true;
            }
        })
        .await?;
    if printed {
        let _ = writeln!(stdout);
    }
    Ok(state)
}
