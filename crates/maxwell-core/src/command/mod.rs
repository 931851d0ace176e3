//! The tool command mini-language: model types and the wire parser.

pub mod model;
pub mod parser;

pub use model::{Arity, Command, CommandKind};
pub use parser::extract_commands;
