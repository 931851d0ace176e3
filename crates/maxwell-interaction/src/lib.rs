//! Provider agents, the tool-invocation mediator, command dispatch, and the
//! conversation loop controller.

pub mod anthropic_api_agent;
pub mod controller;
pub mod executor;
pub mod interpreter;
pub mod models;
pub mod openai_api_agent;
pub mod prompts;

#[cfg(test)]
mod testing;

pub use anthropic_api_agent::AnthropicApiAgent;
pub use controller::SessionController;
pub use executor::{CommandExecutor, ExecutionOutcome};
pub use interpreter::{contains_trigger, ToolInvocation, ToolMediator, ToolOutcome};
pub use models::{find_model, supported_models, BackendFactory, ModelSpec, Provider};
pub use openai_api_agent::OpenAIApiAgent;
