//! Maxwell core: the tool-command mini-language, conversation model, and the
//! completion capability the rest of the workspace builds on.

pub mod agent;
pub mod command;
pub mod config;
pub mod error;
pub mod session;

// Re-export common error type
pub use error::{MaxwellError, Result};
