//! Command-line interface module.

mod args;
pub mod assemble;
pub mod head;

pub use args::{AssembleArgs, Cli, Commands};
