//! Run entry points: [`run`] with config from .env, [`run_with_options`] with
//! overrides, [`run_with_config`] with an explicit config, and [`run_agent`]
//! over caller-supplied collaborators.

pub use crate::config::Error;

mod run_agent;
#[cfg(feature = "openai")]
mod run_with_config;

pub use run_agent::run_agent;
#[cfg(feature = "openai")]
pub use run_with_config::run_with_config;

#[cfg(feature = "openai")]
use raggraph::AgentState;

#[cfg(feature = "openai")]
use crate::config::{RunConfig, RunOptions};

/// Answer `question` with config from env (and .env).
#[cfg(feature = "openai")]
pub async fn run(question: &str) -> Result<AgentState, Error> {
    dotenv::dotenv().ok();
    let config = RunConfig::from_env()?;
    run_with_config(&config, question).await
}

/// Like [`run`], with `options` applied on top of the env config.
#[cfg(feature = "openai")]
pub async fn run_with_options(question: &str, options: &RunOptions) -> Result<AgentState, Error> {
    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.apply_options(options);
    run_with_config(&config, question).await
}
